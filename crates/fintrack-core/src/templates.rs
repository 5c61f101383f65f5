//! Lifecycle operations on recurring templates.
//!
//! The template is the only unit of mutation: expanded occurrences are never
//! edited or deleted individually.

use tracing::debug;

use fintrack_domain::{position_by_id, RecurringTransaction};

use crate::CoreError;

pub struct TemplateService;

impl TemplateService {
    /// Validates and appends a template, returning its id.
    pub fn add(
        templates: &mut Vec<RecurringTransaction>,
        template: RecurringTransaction,
    ) -> Result<String, CoreError> {
        template.validate()?;
        if position_by_id(templates, &template.id).is_some() {
            return Err(CoreError::Validation(format!(
                "recurring template {} already exists",
                template.id
            )));
        }
        let id = template.id.clone();
        templates.push(template);
        debug!(template = %id, "added recurring template");
        Ok(id)
    }

    /// Applies `edit` to the template and returns the stored result; the
    /// change is discarded if it leaves the template invalid.
    pub fn update<F>(
        templates: &mut [RecurringTransaction],
        template_id: &str,
        edit: F,
    ) -> Result<RecurringTransaction, CoreError>
    where
        F: FnOnce(&mut RecurringTransaction),
    {
        let position = position_by_id(templates, template_id)
            .ok_or_else(|| CoreError::TemplateNotFound(template_id.to_string()))?;
        let slot = &mut templates[position];
        let mut edited = slot.clone();
        edit(&mut edited);
        edited.id = slot.id.clone();
        edited.validate()?;
        *slot = edited.clone();
        debug!(template = template_id, "updated recurring template");
        Ok(edited)
    }

    /// Toggles the paused flag. Unlike [`Self::update`] this does not
    /// validate, so a stored template that is already invalid can still be
    /// paused or resumed.
    pub fn set_paused(
        templates: &mut [RecurringTransaction],
        template_id: &str,
        paused: bool,
    ) -> Result<(), CoreError> {
        let position = position_by_id(templates, template_id)
            .ok_or_else(|| CoreError::TemplateNotFound(template_id.to_string()))?;
        templates[position].is_paused = paused;
        Ok(())
    }

    pub fn remove(
        templates: &mut Vec<RecurringTransaction>,
        template_id: &str,
    ) -> Result<RecurringTransaction, CoreError> {
        let position = position_by_id(templates, template_id)
            .ok_or_else(|| CoreError::TemplateNotFound(template_id.to_string()))?;
        Ok(templates.remove(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fintrack_domain::{ExpenseCategory, Frequency};

    fn rent() -> RecurringTransaction {
        RecurringTransaction::expense(
            "Rent",
            ExpenseCategory::Housing,
            900.0,
            Frequency::Monthly,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    #[test]
    fn add_pause_resume_remove() {
        let mut templates = Vec::new();
        let id = TemplateService::add(&mut templates, rent()).unwrap();

        TemplateService::set_paused(&mut templates, &id, true).unwrap();
        assert!(templates[0].is_paused);
        TemplateService::set_paused(&mut templates, &id, false).unwrap();
        assert!(!templates[0].is_paused);

        let removed = TemplateService::remove(&mut templates, &id).unwrap();
        assert_eq!(removed.id, id);
        assert!(templates.is_empty());
        assert!(matches!(
            TemplateService::remove(&mut templates, &id),
            Err(CoreError::TemplateNotFound(_))
        ));
    }

    #[test]
    fn invalid_edits_are_rolled_back() {
        let mut templates = vec![rent()];
        let id = templates[0].id.clone();
        let result = TemplateService::update(&mut templates, &id, |template| {
            template.end_date = NaiveDate::from_ymd_opt(2023, 1, 1);
        });
        assert!(matches!(result, Err(CoreError::Domain(_))));
        assert_eq!(templates[0].end_date, None);
    }

    #[test]
    fn stored_invalid_template_can_still_be_paused() {
        let raw = r#"[{
            "id": "bad",
            "type": "expense",
            "name": "Insurance",
            "category": "other",
            "amount": 40,
            "frequency": "monthly",
            "startDate": "2024-05-01",
            "endDate": "2024-04-01",
            "isPaused": false
        }]"#;
        let mut templates: Vec<RecurringTransaction> = serde_json::from_str(raw).unwrap();
        assert!(templates[0].validate().is_err());

        TemplateService::set_paused(&mut templates, "bad", true).unwrap();
        assert!(templates[0].is_paused);
        TemplateService::set_paused(&mut templates, "bad", false).unwrap();
        assert!(!templates[0].is_paused);
        assert!(matches!(
            TemplateService::set_paused(&mut templates, "missing", true),
            Err(CoreError::TemplateNotFound(_))
        ));
    }

    #[test]
    fn add_rejects_invalid_templates() {
        let mut templates = Vec::new();
        let mut negative = rent();
        negative.amount = -10.0;
        assert!(TemplateService::add(&mut templates, negative).is_err());
        assert!(templates.is_empty());
    }
}
