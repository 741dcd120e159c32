//! Draft documents: a recipe draft written down as JSON.

use std::path::Path;

use cookbook_authoring::DraftOrchestrator;
use cookbook_core::{CookbookError, IconTag, Instruction, Result};
use serde::{Deserialize, Serialize};

/// A recipe draft as entered through the wizard, in file form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftDocument {
    pub name: Option<String>,
    pub category: Option<String>,
    pub origin: Option<String>,
    pub picture: Option<String>,
    pub time: Option<String>,
    pub difficulty: Option<String>,
    pub price: Option<String>,
    pub url: Option<String>,
    pub instructions: Vec<StepInput>,
    pub ingredients: Vec<IngredientInput>,
}

/// One instruction step as typed by the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepInput {
    pub description: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientInput {
    pub ingredient: String,
    pub measurement: String,
}

impl DraftDocument {
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CookbookError::SerializationError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Feed the document into a session, field by field, the way the
    /// wizard screens would.
    pub fn apply(&self, session: &mut DraftOrchestrator) -> Result<()> {
        if let Some(ref name) = self.name {
            session.update_recipe_name(name.clone())?;
        }
        session.update_recipe_category(self.category.clone());
        session.update_recipe_origin(self.origin.clone());
        if let Some(ref picture) = self.picture {
            session.update_recipe_picture(picture.clone());
        }
        session.update_recipe_time(self.time.clone());
        session.update_recipe_difficulty(self.difficulty.clone());
        session.update_recipe_price(self.price.clone());
        session.update_recipe_url(self.url.clone());

        for step in &self.instructions {
            let icon = IconTag::resolve(step.icon.as_deref());
            let instruction =
                Instruction::new(step.description.clone(), step.time.clone(), Some(icon))?;
            session.add_recipe_instruction(instruction);
        }

        for pair in &self.ingredients {
            session
                .add_ingredient_and_measurement(pair.ingredient.clone(), pair.measurement.clone())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cookbook_store::InMemoryRecipeRepository;
    use std::sync::Arc;

    const PANCAKES: &str = r#"{
        "name": "Pancakes",
        "category": "Breakfast",
        "picture": "pancakes.jpg",
        "instructions": [
            {"description": "Whisk eggs and milk", "icon": "mix"},
            {"description": "Fry", "time": "3", "icon": "griddle"}
        ],
        "ingredients": [
            {"ingredient": "Eggs", "measurement": "2"},
            {"ingredient": "Milk", "measurement": "250ml"}
        ]
    }"#;

    fn session() -> DraftOrchestrator {
        DraftOrchestrator::new(Arc::new(InMemoryRecipeRepository::new()))
    }

    #[test]
    fn test_apply_full_document() {
        let document = DraftDocument::from_json(PANCAKES).unwrap();
        let mut session = session();
        document.apply(&mut session).unwrap();

        let draft = session.draft();
        assert_eq!(draft.name(), "Pancakes");
        assert_eq!(draft.category(), Some("Breakfast"));
        assert_eq!(draft.instruction_count(), 2);
        assert_eq!(draft.instruction(0).unwrap().icon(), IconTag::Mix);
        // Unknown icon falls back to the default.
        assert_eq!(draft.instruction(1).unwrap().icon(), IconTag::Default);
        assert_eq!(draft.ingredient_count(), 2);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let document = DraftDocument::from_json(r#"{"name": "Toast"}"#).unwrap();
        let mut session = session();
        document.apply(&mut session).unwrap();
        assert!(session.instructions().is_empty());
        assert!(session.draft().validate().is_err());
    }

    #[test]
    fn test_blank_fields_surface_as_illegal_argument() {
        let mut session = session();
        let blank_name = DraftDocument::from_json(r#"{"name": " "}"#).unwrap();
        assert!(matches!(
            blank_name.apply(&mut session),
            Err(CookbookError::IllegalArgument { field: "name", .. })
        ));

        let blank_step =
            DraftDocument::from_json(r#"{"instructions": [{"description": ""}]}"#).unwrap();
        assert!(matches!(
            blank_step.apply(&mut session),
            Err(CookbookError::IllegalArgument { field: "instruction", .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        let result = DraftDocument::from_json("{ not json");
        assert!(matches!(result, Err(CookbookError::SerializationError(_))));
    }
}
