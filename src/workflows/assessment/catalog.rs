use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::{
    Construct, Cutline, DifficultyTier, Item, ItemId, ItemType, RoleProfile, RoleSlug,
    RoleWeightSet,
};

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    InvalidRow { line: u64, reason: String },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(err) => write!(f, "failed to read catalog: {}", err),
            CatalogError::Csv(err) => write!(f, "invalid item bank CSV: {}", err),
            CatalogError::Json(err) => write!(f, "invalid catalog JSON: {}", err),
            CatalogError::InvalidRow { line, reason } => {
                write!(f, "item bank line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(err) => Some(err),
            CatalogError::Csv(err) => Some(err),
            CatalogError::Json(err) => Some(err),
            CatalogError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Read-only catalog of authored items keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct ItemBank {
    items: HashMap<ItemId, Item>,
}

#[derive(Debug, Deserialize)]
struct ItemRow {
    item_id: String,
    construct: Construct,
    item_type: ItemType,
    #[serde(default)]
    correct_answer: Option<String>,
    #[serde(default)]
    options: Option<String>,
    #[serde(default)]
    time_limit_seconds: Option<u32>,
    difficulty: DifficultyTier,
}

impl ItemBank {
    pub fn new(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|item| (item.id.clone(), item))
                .collect(),
        }
    }

    /// Load from CSV with columns
    /// `item_id,construct,item_type,correct_answer,options,time_limit_seconds,difficulty`.
    /// Options are `|`-separated in presentation order.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut items = Vec::new();

        for result in csv_reader.deserialize::<ItemRow>() {
            let row = result?;
            if row.item_id.is_empty() {
                return Err(CatalogError::InvalidRow {
                    line: items.len() as u64 + 2,
                    reason: "item_id is empty".to_string(),
                });
            }

            let options = row
                .options
                .filter(|raw| !raw.is_empty())
                .map(|raw| raw.split('|').map(|option| option.trim().to_string()).collect())
                .unwrap_or_default();

            let item = Item {
                id: ItemId(row.item_id),
                construct: row.construct,
                item_type: row.item_type,
                correct_answer: row.correct_answer.filter(|answer| !answer.is_empty()),
                options,
                time_limit_seconds: row.time_limit_seconds,
                difficulty: row.difficulty,
            };
            validate_item(&item, items.len() as u64 + 2)?;
            items.push(item);
        }

        Ok(Self::new(items))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items ordered by identifier.
    pub fn items(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items.values().collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        items
    }
}

fn validate_item(item: &Item, line: u64) -> Result<(), CatalogError> {
    let reason = match item.item_type {
        ItemType::SingleChoice | ItemType::TimedChoice if item.correct_answer.is_none() => {
            Some("choice items require a correct_answer")
        }
        ItemType::LikertScale if item.options.is_empty() => Some("likert items require options"),
        ItemType::TimedChoice if item.time_limit_seconds.is_none() => {
            Some("timed items require time_limit_seconds")
        }
        _ => None,
    };

    match reason {
        Some(reason) => Err(CatalogError::InvalidRow {
            line,
            reason: format!("{} ({})", reason, item.id.0),
        }),
        None => Ok(()),
    }
}

/// Role weights and cutlines keyed by slug.
#[derive(Debug, Clone, Default)]
pub struct RoleCatalog {
    roles: BTreeMap<RoleSlug, RoleProfile>,
}

impl RoleCatalog {
    pub fn new(roles: impl IntoIterator<Item = RoleProfile>) -> Self {
        Self {
            roles: roles
                .into_iter()
                .map(|role| (role.slug.clone(), role))
                .collect(),
        }
    }

    /// Load from a JSON array of role profiles.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let roles: Vec<RoleProfile> = serde_json::from_reader(reader)?;
        Ok(Self::new(roles))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::from_json_reader(file)
    }

    pub fn get(&self, slug: &RoleSlug) -> Option<&RoleProfile> {
        self.roles.get(slug)
    }

    pub fn contains(&self, slug: &RoleSlug) -> bool {
        self.roles.contains_key(slug)
    }

    /// Every role, ordered by slug.
    pub fn roles(&self) -> impl Iterator<Item = &RoleProfile> {
        self.roles.values()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

/// Immutable reference data snapshot handed to every scoring run.
#[derive(Debug, Clone, Default)]
pub struct ScoringCatalog {
    pub items: ItemBank,
    pub roles: RoleCatalog,
}

impl ScoringCatalog {
    pub fn new(items: ItemBank, roles: RoleCatalog) -> Self {
        Self { items, roles }
    }

    /// Built-in bank covering every construct plus three reference roles.
    pub fn standard() -> Self {
        Self::new(standard_item_bank(), standard_roles())
    }
}

const CHOICE_OPTIONS: [&str; 4] = ["A", "B", "C", "D"];
const LIKERT_OPTIONS: [&str; 5] = [
    "Strongly disagree",
    "Disagree",
    "Neutral",
    "Agree",
    "Strongly agree",
];
const TIMED_LIMIT_SECONDS: u32 = 45;

fn item_plan(construct: Construct) -> &'static [ItemType] {
    match construct {
        Construct::FluidReasoning
        | Construct::PatternRecognition
        | Construct::QuantitativeReasoning
        | Construct::SpatialReasoning => &[
            ItemType::SingleChoice,
            ItemType::SingleChoice,
            ItemType::TimedChoice,
            ItemType::TimedChoice,
        ],
        Construct::ExecutiveControl | Construct::MechanicalReasoning => {
            &[ItemType::TimedChoice, ItemType::TimedChoice, ItemType::SingleChoice]
        }
        Construct::CognitiveFlexibility | Construct::LearningVelocity => &[
            ItemType::SingleChoice,
            ItemType::SingleChoice,
            ItemType::SingleChoice,
            ItemType::FreeText,
        ],
        Construct::SystemsDiagnostics => &[
            ItemType::SingleChoice,
            ItemType::TimedChoice,
            ItemType::SingleChoice,
            ItemType::AiFollowUp,
        ],
        Construct::MetacognitiveCalibration => &[
            ItemType::LikertScale,
            ItemType::LikertScale,
            ItemType::SingleChoice,
        ],
        Construct::ProceduralReliability | Construct::EthicalJudgment => &[
            ItemType::LikertScale,
            ItemType::LikertScale,
            ItemType::LikertScale,
            ItemType::FreeText,
        ],
    }
}

fn standard_item_bank() -> ItemBank {
    let mut items = Vec::new();
    for construct in Construct::ALL {
        for (index, item_type) in item_plan(construct).iter().enumerate() {
            let difficulty = match index {
                0 => DifficultyTier::Foundational,
                1 => DifficultyTier::Intermediate,
                _ => DifficultyTier::Advanced,
            };
            let (correct_answer, options) = match item_type {
                ItemType::SingleChoice | ItemType::TimedChoice => (
                    Some(CHOICE_OPTIONS[(index + 1) % CHOICE_OPTIONS.len()].to_string()),
                    CHOICE_OPTIONS.iter().map(|option| option.to_string()).collect(),
                ),
                ItemType::LikertScale => (
                    None,
                    LIKERT_OPTIONS.iter().map(|option| option.to_string()).collect(),
                ),
                ItemType::FreeText | ItemType::AiFollowUp => (None, Vec::new()),
            };

            items.push(Item {
                id: ItemId(format!("{}-{:02}", construct.key(), index + 1)),
                construct,
                item_type: *item_type,
                correct_answer,
                options,
                time_limit_seconds: (*item_type == ItemType::TimedChoice)
                    .then_some(TIMED_LIMIT_SECONDS),
                difficulty,
            });
        }
    }
    ItemBank::new(items)
}

fn standard_roles() -> RoleCatalog {
    let role = |slug: &str,
                name: &str,
                weights: &[(Construct, u32)],
                cutline: (u8, u8, u8)| RoleProfile {
        id: format!("role-{slug}"),
        slug: RoleSlug(slug.to_string()),
        name: name.to_string(),
        weights: weights.iter().copied().collect::<RoleWeightSet>(),
        cutline: Some(Cutline {
            technical_aptitude: cutline.0,
            behavioral_integrity: cutline.1,
            learning_velocity: cutline.2,
            overall_minimum: None,
        }),
    };

    RoleCatalog::new([
        role(
            "field-technician",
            "Field Technician",
            &[
                (Construct::SystemsDiagnostics, 20),
                (Construct::MechanicalReasoning, 15),
                (Construct::SpatialReasoning, 10),
                (Construct::ProceduralReliability, 15),
                (Construct::EthicalJudgment, 10),
                (Construct::LearningVelocity, 10),
                (Construct::FluidReasoning, 10),
                (Construct::ExecutiveControl, 10),
            ],
            (55, 60, 50),
        ),
        role(
            "systems-analyst",
            "Systems Analyst",
            &[
                (Construct::FluidReasoning, 20),
                (Construct::PatternRecognition, 15),
                (Construct::QuantitativeReasoning, 15),
                (Construct::SystemsDiagnostics, 15),
                (Construct::LearningVelocity, 15),
                (Construct::MetacognitiveCalibration, 10),
                (Construct::CognitiveFlexibility, 10),
            ],
            (60, 55, 60),
        ),
        role(
            "operations-supervisor",
            "Operations Supervisor",
            &[
                (Construct::ExecutiveControl, 15),
                (Construct::EthicalJudgment, 20),
                (Construct::ProceduralReliability, 20),
                (Construct::MetacognitiveCalibration, 15),
                (Construct::CognitiveFlexibility, 10),
                (Construct::LearningVelocity, 10),
                (Construct::FluidReasoning, 10),
            ],
            (45, 70, 50),
        ),
    ])
}
