use std::fmt;
use std::str::FromStr;

/// Categories the editor offers out of the box.
///
/// Imported files may carry other values; see
/// [`extra_categories`](crate::services::presets::extra_categories).
pub const CATEGORY_PRESETS: [&str; 8] = [
    "weapons",
    "food",
    "tools",
    "clothes",
    "books",
    "containers",
    "explosives",
    "lootdispatch",
];

pub const USAGE_PRESETS: [&str; 16] = [
    "coast",
    "farm",
    "firefighter",
    "hunting",
    "industrial",
    "medic",
    "military",
    "office",
    "police",
    "prison",
    "school",
    "town",
    "village",
    "lunapark",
    "seasonalevent",
    "contaminated area",
];

pub const VALUE_PRESETS: [&str; 4] = ["Tier1", "Tier2", "Tier3", "Tier4"];

pub const TAG_PRESETS: [&str; 4] = ["none", "shelves", "floor", "ground"];

/// Names of the spawn-behavior switches carried by `<flags/>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagName {
    CountInCargo,
    CountInHoarder,
    CountInMap,
    CountInPlayer,
    Crafted,
    Deloot,
}

impl FlagName {
    /// All flags in the attribute order DayZ ships them in.
    pub const ALL: [FlagName; 6] = [
        FlagName::CountInCargo,
        FlagName::CountInHoarder,
        FlagName::CountInMap,
        FlagName::CountInPlayer,
        FlagName::Crafted,
        FlagName::Deloot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlagName::CountInCargo => "count_in_cargo",
            FlagName::CountInHoarder => "count_in_hoarder",
            FlagName::CountInMap => "count_in_map",
            FlagName::CountInPlayer => "count_in_player",
            FlagName::Crafted => "crafted",
            FlagName::Deloot => "deloot",
        }
    }
}

impl fmt::Display for FlagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlagName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FlagName::ALL
            .into_iter()
            .find(|flag| flag.as_str() == s)
            .ok_or_else(|| format!("unknown flag '{}'", s))
    }
}

/// Boolean spawn switches of a type. A flag missing from the file is `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags {
    pub count_in_cargo: bool,
    pub count_in_hoarder: bool,
    pub count_in_map: bool,
    pub count_in_player: bool,
    pub crafted: bool,
    pub deloot: bool,
}

impl Flags {
    pub fn get(&self, flag: FlagName) -> bool {
        match flag {
            FlagName::CountInCargo => self.count_in_cargo,
            FlagName::CountInHoarder => self.count_in_hoarder,
            FlagName::CountInMap => self.count_in_map,
            FlagName::CountInPlayer => self.count_in_player,
            FlagName::Crafted => self.crafted,
            FlagName::Deloot => self.deloot,
        }
    }

    pub fn set(&mut self, flag: FlagName, value: bool) {
        let slot = match flag {
            FlagName::CountInCargo => &mut self.count_in_cargo,
            FlagName::CountInHoarder => &mut self.count_in_hoarder,
            FlagName::CountInMap => &mut self.count_in_map,
            FlagName::CountInPlayer => &mut self.count_in_player,
            FlagName::Crafted => &mut self.crafted,
            FlagName::Deloot => &mut self.deloot,
        };
        *slot = value;
    }

    /// `(flag, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (FlagName, bool)> + '_ {
        FlagName::ALL.into_iter().map(|flag| (flag, self.get(flag)))
    }

    /// Names of the flags that are switched on.
    pub fn enabled(&self) -> Vec<&'static str> {
        self.iter()
            .filter(|(_, on)| *on)
            .map(|(flag, _)| flag.as_str())
            .collect()
    }
}

/// One `<type>` entry: loot-spawn tuning for a single item class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TypeRecord {
    pub name: String,
    pub nominal: i64,
    pub lifetime: i64,
    pub restock: i64,
    pub min: i64,
    pub quantmin: i64,
    pub quantmax: i64,
    pub cost: i64,
    pub flags: Flags,
    pub category: Option<String>,
    pub usage: Vec<String>,
    pub value: Vec<String>,
    pub tag: Vec<String>,
}

impl TypeRecord {
    /// A record with every number at 0, every flag off and no lists.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Starting point for a brand-new type in the editor: counted on the map.
    pub fn template(name: impl Into<String>) -> Self {
        let mut record = Self::new(name);
        record.flags.count_in_map = true;
        record
    }

    /// Value copy of this record under another name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn push_usage(&mut self, entry: &str) -> bool {
        push_unique(&mut self.usage, entry)
    }

    pub fn push_value(&mut self, entry: &str) -> bool {
        push_unique(&mut self.value, entry)
    }

    pub fn push_tag(&mut self, entry: &str) -> bool {
        push_unique(&mut self.tag, entry)
    }

    /// Drop what a `types.xml` file cannot carry: an empty category and
    /// empty list entries.
    pub fn normalize(&mut self) {
        if self.category.as_deref() == Some("") {
            self.category = None;
        }
        for list in [&mut self.usage, &mut self.value, &mut self.tag] {
            list.retain(|entry| !entry.is_empty());
        }
    }

    /// Set the category; blank input clears it.
    pub fn set_category(&mut self, category: &str) {
        let trimmed = category.trim();
        self.category = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }
}

/// Trimmed, non-blank, not already present.
fn push_unique(list: &mut Vec<String>, entry: &str) -> bool {
    let entry = entry.trim();
    if entry.is_empty() || list.iter().any(|existing| existing == entry) {
        return false;
    }
    list.push(entry.to_string());
    true
}
