/// New-task form
///
/// Field rules mirror the task dialog: a short title, an optional
/// description, at least one assignee written as a comma-separated list, and
/// a due date that is not in the past.

use crate::models::task::{CreateTask, TaskPriority, TaskStatus};
use crate::validation::{parse_assignees, validate_assignee_names, validate_due_date};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

/// Raw form input for a new task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskForm {
    #[validate(
        custom(function = "require_title"),
        length(max = 100, message = "Title must be less than 100 characters")
    )]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be less than 500 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub priority: TaskPriority,

    /// Comma-separated assignee names
    #[validate(
        custom(function = "check_assignees"),
        length(max = 200, message = "Assignee names must be less than 200 characters")
    )]
    pub assignees: String,

    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

fn form_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn require_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(form_error("required", "Title is required"));
    }
    Ok(())
}

fn check_assignees(assignees: &str) -> Result<(), ValidationError> {
    let names = parse_assignees(assignees);
    if names.is_empty() {
        return Err(form_error("required", "At least one assignee is required"));
    }
    if validate_assignee_names(&names).is_err() {
        return Err(form_error("assignee_names", "Invalid assignee names"));
    }
    Ok(())
}

impl TaskForm {
    /// Trims the free-text fields; an all-blank description becomes `None`
    pub fn normalized(self) -> Self {
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Self {
            title: self.title.trim().to_string(),
            description,
            assignees: self.assignees.trim().to_string(),
            ..self
        }
    }

    /// Runs every field rule, judging the due date against `today`
    pub fn validate_on(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Some(due) = self.due_date {
            if validate_due_date(due, today).is_err() {
                errors.add(
                    "due_date",
                    form_error("due_date_in_past", "Due date cannot be in the past"),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Converts a validated form into a new `todo` task starting `today`
    pub fn into_create_task(self, today: NaiveDate) -> CreateTask {
        CreateTask {
            title: self.title,
            description: self.description,
            priority: self.priority,
            status: TaskStatus::Todo,
            assignees: parse_assignees(&self.assignees),
            due_date: self.due_date,
            start_date: Some(today),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
    }

    fn valid_form() -> TaskForm {
        TaskForm {
            title: "Plan sprint".to_string(),
            description: Some("Pick the next stories".to_string()),
            priority: TaskPriority::High,
            assignees: "John Doe, Jane Smith".to_string(),
            due_date: NaiveDate::from_ymd_opt(2025, 8, 10),
        }
    }

    fn messages(errors: &ValidationErrors, field: &str) -> Vec<String> {
        errors
            .field_errors()
            .iter()
            .filter(|(name, _)| name.to_string() == field)
            .flat_map(|(_, errs)| errs.iter())
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .collect()
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(valid_form().validate_on(today()).is_ok());
    }

    #[test]
    fn test_title_rules() {
        let form = TaskForm {
            title: "   ".to_string(),
            ..valid_form()
        };
        let errors = form.validate_on(today()).unwrap_err();
        assert_eq!(messages(&errors, "title"), vec!["Title is required"]);

        let form = TaskForm {
            title: "x".repeat(101),
            ..valid_form()
        };
        let errors = form.validate_on(today()).unwrap_err();
        assert_eq!(
            messages(&errors, "title"),
            vec!["Title must be less than 100 characters"]
        );

        let form = TaskForm {
            title: "x".repeat(100),
            ..valid_form()
        };
        assert!(form.validate_on(today()).is_ok());
    }

    #[test]
    fn test_description_bound() {
        let form = TaskForm {
            description: Some("d".repeat(501)),
            ..valid_form()
        };
        let errors = form.validate_on(today()).unwrap_err();
        assert_eq!(
            messages(&errors, "description"),
            vec!["Description must be less than 500 characters"]
        );
    }

    #[test]
    fn test_assignee_rules() {
        let form = TaskForm {
            assignees: " , ".to_string(),
            ..valid_form()
        };
        let errors = form.validate_on(today()).unwrap_err();
        assert_eq!(
            messages(&errors, "assignees"),
            vec!["At least one assignee is required"]
        );

        let form = TaskForm {
            assignees: "John Doe, J0hn".to_string(),
            ..valid_form()
        };
        let errors = form.validate_on(today()).unwrap_err();
        assert_eq!(messages(&errors, "assignees"), vec!["Invalid assignee names"]);

        let form = TaskForm {
            assignees: "José García, O'Brien, Mary-Jane".to_string(),
            ..valid_form()
        };
        assert!(form.validate_on(today()).is_ok());
    }

    #[test]
    fn test_due_date_cannot_be_in_the_past() {
        let form = TaskForm {
            due_date: NaiveDate::from_ymd_opt(2025, 7, 31),
            ..valid_form()
        };
        let errors = form.validate_on(today()).unwrap_err();
        assert_eq!(
            messages(&errors, "due_date"),
            vec!["Due date cannot be in the past"]
        );

        let form = TaskForm {
            due_date: Some(today()),
            ..valid_form()
        };
        assert!(form.validate_on(today()).is_ok());

        let form = TaskForm {
            due_date: None,
            ..valid_form()
        };
        assert!(form.validate_on(today()).is_ok());
    }

    #[test]
    fn test_normalized_trims() {
        let form = TaskForm {
            title: "  Plan  ".to_string(),
            description: Some("   ".to_string()),
            assignees: " John Doe ".to_string(),
            ..valid_form()
        }
        .normalized();

        assert_eq!(form.title, "Plan");
        assert_eq!(form.description, None);
        assert_eq!(form.assignees, "John Doe");
    }

    #[test]
    fn test_into_create_task() {
        let data = valid_form().into_create_task(today());

        assert_eq!(data.status, TaskStatus::Todo);
        assert_eq!(data.start_date, Some(today()));
        assert_eq!(data.priority, TaskPriority::High);
        assert_eq!(data.assignees, vec!["John Doe", "Jane Smith"]);
        assert_eq!(data.column_id, None);
    }
}
