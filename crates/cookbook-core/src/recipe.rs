//! Recipe content types: instruction steps, ingredient pairs and the
//! finished recipe entity.

use serde::{Deserialize, Serialize};

use crate::error::{CookbookError, Result};
use crate::types::IconTag;

/// One step of a recipe.
///
/// The description is never blank; construction rejects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "InstructionRecord")]
pub struct Instruction {
    description: String,
    time: Option<String>,
    icon: IconTag,
}

impl Instruction {
    /// Create an instruction. `time` is free-form and not validated.
    pub fn new(
        description: impl Into<String>,
        time: Option<String>,
        icon: Option<IconTag>,
    ) -> Result<Self> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(CookbookError::blank("instruction"));
        }

        Ok(Self {
            description,
            time,
            icon: icon.unwrap_or_default(),
        })
    }

    /// Step text.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Time hint as entered, if any.
    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    /// Icon shown next to the step.
    pub fn icon(&self) -> IconTag {
        self.icon
    }
}

/// Wire shape for [`Instruction`]; routes deserialization through `new`.
#[derive(Deserialize)]
struct InstructionRecord {
    description: String,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    icon: Option<String>,
}

impl TryFrom<InstructionRecord> for Instruction {
    type Error = CookbookError;

    fn try_from(record: InstructionRecord) -> Result<Self> {
        let icon = IconTag::resolve(record.icon.as_deref());
        Instruction::new(record.description, record.time, Some(icon))
    }
}

/// An ingredient together with how much of it to use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IngredientRecord")]
pub struct IngredientMeasurement {
    ingredient: String,
    measurement: String,
}

impl IngredientMeasurement {
    /// Create a pair. Both fields must be non-blank.
    pub fn new(ingredient: impl Into<String>, measurement: impl Into<String>) -> Result<Self> {
        let ingredient = ingredient.into();
        let measurement = measurement.into();

        if ingredient.trim().is_empty() {
            return Err(CookbookError::blank("ingredient"));
        }
        if measurement.trim().is_empty() {
            return Err(CookbookError::blank("measurement"));
        }

        Ok(Self {
            ingredient,
            measurement,
        })
    }

    /// Ingredient name.
    pub fn ingredient(&self) -> &str {
        &self.ingredient
    }

    /// Amount as entered, e.g. "200g".
    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    /// Exact comparison against raw field values.
    pub fn matches(&self, ingredient: &str, measurement: &str) -> bool {
        self.ingredient == ingredient && self.measurement == measurement
    }
}

#[derive(Deserialize)]
struct IngredientRecord {
    ingredient: String,
    measurement: String,
}

impl TryFrom<IngredientRecord> for IngredientMeasurement {
    type Error = CookbookError;

    fn try_from(record: IngredientRecord) -> Result<Self> {
        IngredientMeasurement::new(record.ingredient, record.measurement)
    }
}

/// A completed recipe, produced by
/// [`RecipeDraftBuilder::build`](crate::draft::RecipeDraftBuilder::build).
///
/// Every entity satisfies the draft invariants at the moment it was built:
/// non-blank name and picture, at least one instruction and one ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeEntity {
    /// Identifier assigned by the recipe repository.
    pub id: String,

    pub name: String,

    pub category: Option<String>,

    /// Cuisine or region the recipe comes from.
    pub origin: Option<String>,

    /// Ordered preparation steps.
    pub instructions: Vec<Instruction>,

    /// Reference to the uploaded picture (storage path or URL).
    pub picture: String,

    /// Ordered ingredient/measurement pairs.
    pub ingredients: Vec<IngredientMeasurement>,

    pub time: Option<String>,

    pub difficulty: Option<String>,

    pub price: Option<String>,

    /// Source link for the recipe, if it was adapted from somewhere.
    pub url: Option<String>,
}

impl RecipeEntity {
    /// Number of preparation steps.
    pub fn step_count(&self) -> usize {
        self.instructions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_defaults_icon() {
        let step = Instruction::new("Mix", None, None).unwrap();
        assert_eq!(step.description(), "Mix");
        assert_eq!(step.time(), None);
        assert_eq!(step.icon(), IconTag::Default);
    }

    #[test]
    fn test_instruction_rejects_blank_description() {
        let result = Instruction::new("   ", Some("5".to_string()), None);
        assert!(matches!(
            result,
            Err(CookbookError::IllegalArgument { field: "instruction", .. })
        ));
    }

    #[test]
    fn test_instruction_deserializes_unknown_icon() {
        let step: Instruction =
            serde_json::from_str(r#"{"description": "Bake", "time": "40", "icon": "kiln"}"#)
                .unwrap();
        assert_eq!(step.icon(), IconTag::Default);
        assert_eq!(step.time(), Some("40"));

        let blank = serde_json::from_str::<Instruction>(r#"{"description": ""}"#);
        assert!(blank.is_err());
    }

    #[test]
    fn test_ingredient_requires_both_fields() {
        assert!(IngredientMeasurement::new("Flour", "200g").is_ok());
        assert!(matches!(
            IngredientMeasurement::new("", "200g"),
            Err(CookbookError::IllegalArgument { field: "ingredient", .. })
        ));
        assert!(matches!(
            IngredientMeasurement::new("Flour", " "),
            Err(CookbookError::IllegalArgument { field: "measurement", .. })
        ));
    }

    #[test]
    fn test_ingredient_matches_exactly() {
        let pair = IngredientMeasurement::new("Flour", "200g").unwrap();
        assert!(pair.matches("Flour", "200g"));
        assert!(!pair.matches("flour", "200g"));
        assert!(!pair.matches("Flour", "200 g"));
    }
}
