// ═══════════════════════════════════════════════════════════════════════
// Map Registry — static territory tables and adjacency graphs
// Everything here is immutable once a map has been selected.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::{ConfigError, LookupError, MapError};
use crate::types::TerritoryId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Display metadata for one territory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritoryInfo {
    pub id: TerritoryId,
    pub name: String,
    pub region: String,
}

/// A validated map: territory metadata plus a symmetric, irreflexive
/// adjacency graph. Neighbour lists are sorted by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    name: String,
    territories: Vec<TerritoryInfo>,
    adjacency: Vec<Vec<TerritoryId>>,
}

impl Map {
    /// Build a map from `(name, region)` pairs and per-territory neighbour
    /// lists (indexed by territory id).
    pub fn new(
        name: impl Into<String>,
        territories: Vec<(String, String)>,
        mut adjacency: Vec<Vec<TerritoryId>>,
    ) -> Result<Map, MapError> {
        if territories.is_empty() {
            return Err(MapError::Empty);
        }
        if territories.len() > u16::MAX as usize {
            return Err(MapError::TooLarge(territories.len()));
        }
        if adjacency.len() > territories.len() {
            return Err(MapError::ExtraAdjacencyRows {
                rows: adjacency.len(),
                territories: territories.len(),
            });
        }
        adjacency.resize(territories.len(), Vec::new());

        let mut seen = HashSet::new();
        for (name, _) in &territories {
            if !seen.insert(name.as_str()) {
                return Err(MapError::DuplicateName(name.clone()));
            }
        }

        let count = territories.len();
        for (i, neighbours) in adjacency.iter_mut().enumerate() {
            let id = TerritoryId(i as u16);
            neighbours.sort_unstable();
            neighbours.dedup();
            for &n in neighbours.iter() {
                if n == id {
                    return Err(MapError::SelfLoop(id));
                }
                if n.index() >= count {
                    return Err(MapError::DanglingEdge(id, n));
                }
            }
        }
        for (i, neighbours) in adjacency.iter().enumerate() {
            let id = TerritoryId(i as u16);
            for &n in neighbours {
                if adjacency[n.index()].binary_search(&id).is_err() {
                    return Err(MapError::Asymmetric(id, n));
                }
            }
        }

        let territories = territories
            .into_iter()
            .enumerate()
            .map(|(i, (name, region))| TerritoryInfo {
                id: TerritoryId(i as u16),
                name,
                region,
            })
            .collect();

        Ok(Map {
            name: name.into(),
            territories,
            adjacency,
        })
    }

    /// Build a map from `(name, region)` pairs and an undirected edge list
    /// given by territory name. Ids follow the order of `territories`.
    pub fn from_edges(
        name: impl Into<String>,
        territories: &[(&str, &str)],
        edges: &[(&str, &str)],
    ) -> Result<Map, MapError> {
        let index: HashMap<&str, TerritoryId> = territories
            .iter()
            .enumerate()
            .map(|(i, (n, _))| (*n, TerritoryId(i as u16)))
            .collect();
        let resolve = |n: &str| {
            index
                .get(n)
                .copied()
                .ok_or_else(|| MapError::UnknownName(n.to_string()))
        };

        let mut adjacency = vec![Vec::new(); territories.len()];
        for &(a, b) in edges {
            let (a, b) = (resolve(a)?, resolve(b)?);
            if a == b {
                return Err(MapError::SelfLoop(a));
            }
            adjacency[a.index()].push(b);
            adjacency[b.index()].push(a);
        }

        let territories = territories
            .iter()
            .map(|(n, r)| (n.to_string(), r.to_string()))
            .collect();
        Map::new(name, territories, adjacency)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.territories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.territories.is_empty()
    }

    pub fn contains(&self, id: TerritoryId) -> bool {
        id.index() < self.territories.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = TerritoryId> {
        (0..self.territories.len()).map(|i| TerritoryId(i as u16))
    }

    pub fn territories(&self) -> &[TerritoryInfo] {
        &self.territories
    }

    pub fn lookup(&self, id: TerritoryId) -> Result<&TerritoryInfo, LookupError> {
        self.territories.get(id.index()).ok_or(LookupError(id))
    }

    pub fn neighbors(&self, id: TerritoryId) -> Result<&[TerritoryId], LookupError> {
        self.adjacency
            .get(id.index())
            .map(Vec::as_slice)
            .ok_or(LookupError(id))
    }

    /// False for unknown ids.
    pub fn are_adjacent(&self, a: TerritoryId, b: TerritoryId) -> bool {
        self.adjacency
            .get(a.index())
            .is_some_and(|n| n.binary_search(&b).is_ok())
    }

    /// Case-insensitive name lookup.
    pub fn find(&self, name: &str) -> Option<TerritoryId> {
        self.territories
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .map(|t| t.id)
    }

    /// Display name, or "?" for an unknown id.
    pub fn display_name(&self, id: TerritoryId) -> &str {
        self.lookup(id).map_or("?", |t| t.name.as_str())
    }

    /// The whole graph, as handed to automated suppliers.
    pub fn adjacency(&self) -> BTreeMap<TerritoryId, Vec<TerritoryId>> {
        self.adjacency
            .iter()
            .enumerate()
            .map(|(i, n)| (TerritoryId(i as u16), n.clone()))
            .collect()
    }
}

// ── Map selection ──────────────────────────────────────────────────────

/// The closed set of built-in maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapSelection {
    World,
    Usa,
}

impl MapSelection {
    pub const ALL: [MapSelection; 2] = [MapSelection::World, MapSelection::Usa];

    pub fn load(self) -> Result<Map, MapError> {
        match self {
            MapSelection::World => Map::from_edges("World", WORLD_TERRITORIES, WORLD_EDGES),
            MapSelection::Usa => Map::from_edges("USA", USA_TERRITORIES, USA_EDGES),
        }
    }
}

impl fmt::Display for MapSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapSelection::World => write!(f, "world"),
            MapSelection::Usa => write!(f, "usa"),
        }
    }
}

impl FromStr for MapSelection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "world" => Ok(MapSelection::World),
            "usa" | "us" => Ok(MapSelection::Usa),
            _ => Err(ConfigError::UnknownMap(s.to_string())),
        }
    }
}

// ── World ──────────────────────────────────────────────────────────────

const NORTH_AMERICA: &str = "North America";
const SOUTH_AMERICA: &str = "South America";
const EUROPE: &str = "Europe";
const AFRICA: &str = "Africa";
const ASIA: &str = "Asia";
const AUSTRALIA: &str = "Australia";

static WORLD_TERRITORIES: &[(&str, &str)] = &[
    ("Alaska", NORTH_AMERICA),
    ("Northwest Territory", NORTH_AMERICA),
    ("Greenland", NORTH_AMERICA),
    ("Alberta", NORTH_AMERICA),
    ("Ontario", NORTH_AMERICA),
    ("Quebec", NORTH_AMERICA),
    ("Western United States", NORTH_AMERICA),
    ("Eastern United States", NORTH_AMERICA),
    ("Central America", NORTH_AMERICA),
    ("Venezuela", SOUTH_AMERICA),
    ("Peru", SOUTH_AMERICA),
    ("Brazil", SOUTH_AMERICA),
    ("Argentina", SOUTH_AMERICA),
    ("Iceland", EUROPE),
    ("Scandinavia", EUROPE),
    ("Great Britain", EUROPE),
    ("Northern Europe", EUROPE),
    ("Western Europe", EUROPE),
    ("Southern Europe", EUROPE),
    ("Ukraine", EUROPE),
    ("North Africa", AFRICA),
    ("Egypt", AFRICA),
    ("East Africa", AFRICA),
    ("Congo", AFRICA),
    ("South Africa", AFRICA),
    ("Madagascar", AFRICA),
    ("Ural", ASIA),
    ("Siberia", ASIA),
    ("Yakutsk", ASIA),
    ("Kamchatka", ASIA),
    ("Irkutsk", ASIA),
    ("Mongolia", ASIA),
    ("Japan", ASIA),
    ("Afghanistan", ASIA),
    ("China", ASIA),
    ("Middle East", ASIA),
    ("India", ASIA),
    ("Siam", ASIA),
    ("Indonesia", AUSTRALIA),
    ("New Guinea", AUSTRALIA),
    ("Western Australia", AUSTRALIA),
    ("Eastern Australia", AUSTRALIA),
];

static WORLD_EDGES: &[(&str, &str)] = &[
    ("Alaska", "Northwest Territory"),
    ("Alaska", "Alberta"),
    ("Alaska", "Kamchatka"),
    ("Northwest Territory", "Alberta"),
    ("Northwest Territory", "Ontario"),
    ("Northwest Territory", "Greenland"),
    ("Greenland", "Ontario"),
    ("Greenland", "Quebec"),
    ("Greenland", "Iceland"),
    ("Alberta", "Ontario"),
    ("Alberta", "Western United States"),
    ("Ontario", "Quebec"),
    ("Ontario", "Western United States"),
    ("Ontario", "Eastern United States"),
    ("Quebec", "Eastern United States"),
    ("Western United States", "Eastern United States"),
    ("Western United States", "Central America"),
    ("Eastern United States", "Central America"),
    ("Central America", "Venezuela"),
    ("Venezuela", "Peru"),
    ("Venezuela", "Brazil"),
    ("Peru", "Brazil"),
    ("Peru", "Argentina"),
    ("Brazil", "Argentina"),
    ("Brazil", "North Africa"),
    ("Iceland", "Great Britain"),
    ("Iceland", "Scandinavia"),
    ("Scandinavia", "Great Britain"),
    ("Scandinavia", "Northern Europe"),
    ("Scandinavia", "Ukraine"),
    ("Great Britain", "Northern Europe"),
    ("Great Britain", "Western Europe"),
    ("Northern Europe", "Western Europe"),
    ("Northern Europe", "Southern Europe"),
    ("Northern Europe", "Ukraine"),
    ("Western Europe", "Southern Europe"),
    ("Western Europe", "North Africa"),
    ("Southern Europe", "Ukraine"),
    ("Southern Europe", "North Africa"),
    ("Southern Europe", "Egypt"),
    ("Southern Europe", "Middle East"),
    ("Ukraine", "Ural"),
    ("Ukraine", "Afghanistan"),
    ("Ukraine", "Middle East"),
    ("North Africa", "Egypt"),
    ("North Africa", "East Africa"),
    ("North Africa", "Congo"),
    ("Egypt", "East Africa"),
    ("Egypt", "Middle East"),
    ("East Africa", "Congo"),
    ("East Africa", "South Africa"),
    ("East Africa", "Madagascar"),
    ("East Africa", "Middle East"),
    ("Congo", "South Africa"),
    ("South Africa", "Madagascar"),
    ("Ural", "Siberia"),
    ("Ural", "China"),
    ("Ural", "Afghanistan"),
    ("Siberia", "Yakutsk"),
    ("Siberia", "Irkutsk"),
    ("Siberia", "Mongolia"),
    ("Siberia", "China"),
    ("Yakutsk", "Kamchatka"),
    ("Yakutsk", "Irkutsk"),
    ("Kamchatka", "Irkutsk"),
    ("Kamchatka", "Mongolia"),
    ("Kamchatka", "Japan"),
    ("Irkutsk", "Mongolia"),
    ("Mongolia", "China"),
    ("Mongolia", "Japan"),
    ("Afghanistan", "China"),
    ("Afghanistan", "India"),
    ("Afghanistan", "Middle East"),
    ("China", "India"),
    ("China", "Siam"),
    ("Middle East", "India"),
    ("India", "Siam"),
    ("Siam", "Indonesia"),
    ("Indonesia", "New Guinea"),
    ("Indonesia", "Western Australia"),
    ("New Guinea", "Western Australia"),
    ("New Guinea", "Eastern Australia"),
    ("Western Australia", "Eastern Australia"),
];

// ── USA (48 contiguous states) ─────────────────────────────────────────

const WEST: &str = "West";
const MIDWEST: &str = "Midwest";
const SOUTH: &str = "South";
const NORTHEAST: &str = "Northeast";

static USA_TERRITORIES: &[(&str, &str)] = &[
    ("Alabama", SOUTH),
    ("Arizona", WEST),
    ("Arkansas", SOUTH),
    ("California", WEST),
    ("Colorado", WEST),
    ("Connecticut", NORTHEAST),
    ("Delaware", SOUTH),
    ("Florida", SOUTH),
    ("Georgia", SOUTH),
    ("Idaho", WEST),
    ("Illinois", MIDWEST),
    ("Indiana", MIDWEST),
    ("Iowa", MIDWEST),
    ("Kansas", MIDWEST),
    ("Kentucky", SOUTH),
    ("Louisiana", SOUTH),
    ("Maine", NORTHEAST),
    ("Maryland", SOUTH),
    ("Massachusetts", NORTHEAST),
    ("Michigan", MIDWEST),
    ("Minnesota", MIDWEST),
    ("Mississippi", SOUTH),
    ("Missouri", MIDWEST),
    ("Montana", WEST),
    ("Nebraska", MIDWEST),
    ("Nevada", WEST),
    ("New Hampshire", NORTHEAST),
    ("New Jersey", NORTHEAST),
    ("New Mexico", WEST),
    ("New York", NORTHEAST),
    ("North Carolina", SOUTH),
    ("North Dakota", MIDWEST),
    ("Ohio", MIDWEST),
    ("Oklahoma", SOUTH),
    ("Oregon", WEST),
    ("Pennsylvania", NORTHEAST),
    ("Rhode Island", NORTHEAST),
    ("South Carolina", SOUTH),
    ("South Dakota", MIDWEST),
    ("Tennessee", SOUTH),
    ("Texas", SOUTH),
    ("Utah", WEST),
    ("Vermont", NORTHEAST),
    ("Virginia", SOUTH),
    ("Washington", WEST),
    ("West Virginia", SOUTH),
    ("Wisconsin", MIDWEST),
    ("Wyoming", WEST),
];

// Shared land borders only; Four Corners point contacts are not edges.
static USA_EDGES: &[(&str, &str)] = &[
    ("Alabama", "Florida"),
    ("Alabama", "Georgia"),
    ("Alabama", "Mississippi"),
    ("Alabama", "Tennessee"),
    ("Arizona", "California"),
    ("Arizona", "Nevada"),
    ("Arizona", "New Mexico"),
    ("Arizona", "Utah"),
    ("Arkansas", "Louisiana"),
    ("Arkansas", "Mississippi"),
    ("Arkansas", "Missouri"),
    ("Arkansas", "Oklahoma"),
    ("Arkansas", "Tennessee"),
    ("Arkansas", "Texas"),
    ("California", "Nevada"),
    ("California", "Oregon"),
    ("Colorado", "Kansas"),
    ("Colorado", "Nebraska"),
    ("Colorado", "New Mexico"),
    ("Colorado", "Oklahoma"),
    ("Colorado", "Utah"),
    ("Colorado", "Wyoming"),
    ("Connecticut", "Massachusetts"),
    ("Connecticut", "New York"),
    ("Connecticut", "Rhode Island"),
    ("Delaware", "Maryland"),
    ("Delaware", "New Jersey"),
    ("Delaware", "Pennsylvania"),
    ("Florida", "Georgia"),
    ("Georgia", "North Carolina"),
    ("Georgia", "South Carolina"),
    ("Georgia", "Tennessee"),
    ("Idaho", "Montana"),
    ("Idaho", "Nevada"),
    ("Idaho", "Oregon"),
    ("Idaho", "Utah"),
    ("Idaho", "Washington"),
    ("Idaho", "Wyoming"),
    ("Illinois", "Indiana"),
    ("Illinois", "Iowa"),
    ("Illinois", "Kentucky"),
    ("Illinois", "Missouri"),
    ("Illinois", "Wisconsin"),
    ("Indiana", "Kentucky"),
    ("Indiana", "Michigan"),
    ("Indiana", "Ohio"),
    ("Iowa", "Minnesota"),
    ("Iowa", "Missouri"),
    ("Iowa", "Nebraska"),
    ("Iowa", "South Dakota"),
    ("Iowa", "Wisconsin"),
    ("Kansas", "Missouri"),
    ("Kansas", "Nebraska"),
    ("Kansas", "Oklahoma"),
    ("Kentucky", "Missouri"),
    ("Kentucky", "Ohio"),
    ("Kentucky", "Tennessee"),
    ("Kentucky", "Virginia"),
    ("Kentucky", "West Virginia"),
    ("Louisiana", "Mississippi"),
    ("Louisiana", "Texas"),
    ("Maine", "New Hampshire"),
    ("Maryland", "Pennsylvania"),
    ("Maryland", "Virginia"),
    ("Maryland", "West Virginia"),
    ("Massachusetts", "New Hampshire"),
    ("Massachusetts", "New York"),
    ("Massachusetts", "Rhode Island"),
    ("Massachusetts", "Vermont"),
    ("Michigan", "Ohio"),
    ("Michigan", "Wisconsin"),
    ("Minnesota", "North Dakota"),
    ("Minnesota", "South Dakota"),
    ("Minnesota", "Wisconsin"),
    ("Mississippi", "Tennessee"),
    ("Missouri", "Nebraska"),
    ("Missouri", "Oklahoma"),
    ("Missouri", "Tennessee"),
    ("Montana", "North Dakota"),
    ("Montana", "South Dakota"),
    ("Montana", "Wyoming"),
    ("Nebraska", "South Dakota"),
    ("Nebraska", "Wyoming"),
    ("Nevada", "Oregon"),
    ("Nevada", "Utah"),
    ("New Hampshire", "Vermont"),
    ("New Jersey", "New York"),
    ("New Jersey", "Pennsylvania"),
    ("New Mexico", "Oklahoma"),
    ("New Mexico", "Texas"),
    ("New York", "Pennsylvania"),
    ("New York", "Vermont"),
    ("North Carolina", "South Carolina"),
    ("North Carolina", "Tennessee"),
    ("North Carolina", "Virginia"),
    ("North Dakota", "South Dakota"),
    ("Ohio", "Pennsylvania"),
    ("Ohio", "West Virginia"),
    ("Oklahoma", "Texas"),
    ("Oregon", "Washington"),
    ("Pennsylvania", "West Virginia"),
    ("South Dakota", "Wyoming"),
    ("Tennessee", "Virginia"),
    ("Utah", "Wyoming"),
    ("Virginia", "West Virginia"),
];
