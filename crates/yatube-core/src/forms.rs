//! Form binding and validation.
//!
//! Forms hold the raw submitted strings so a failed submission can be shown
//! again exactly as typed, together with per-field errors.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::domain::{Group, Post};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// Longest accepted username.
pub const USERNAME_MAX_LEN: usize = 150;
/// Shortest accepted password.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Usernames that would collide with top-level routes.
pub const RESERVED_USERNAMES: &[&str] = &["new", "group", "auth", "health"];

/// Field-level validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    /// Errors for one field, empty if it is valid.
    pub fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Validated post content, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub text: String,
    pub group_id: Option<Uuid>,
}

/// The text and group selection of a post, as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub text: String,
    pub group: String,
}

impl PostForm {
    pub fn new(text: impl Into<String>, group: Option<String>) -> Self {
        Self {
            text: text.into(),
            group: group.unwrap_or_default(),
        }
    }

    /// Bind an existing post for editing.
    pub fn from_post(post: &Post) -> Self {
        Self {
            text: post.text.clone(),
            group: post.group_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }

    /// Validate against the groups offered as choices.
    pub fn validate(&self, choices: &[Group]) -> Result<PostDraft, FormErrors> {
        let mut errors = FormErrors::default();

        let text = self.text.trim();
        if text.is_empty() {
            errors.add("text", REQUIRED);
        }

        let group = self.group.trim();
        let group_id = if group.is_empty() {
            None
        } else {
            let chosen = Uuid::parse_str(group)
                .ok()
                .filter(|id| choices.iter().any(|g| g.id == *id));
            if chosen.is_none() {
                errors.add("group", INVALID_CHOICE);
            }
            chosen
        };

        errors.into_result(PostDraft {
            text: text.to_string(),
            group_id,
        })
    }
}

/// Account registration input.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub username: String,
    pub password1: String,
    pub password2: String,
}

/// Validated registration data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupDraft {
    pub username: String,
    pub password: String,
}

impl SignupForm {
    /// Check field rules. Username uniqueness is checked by the caller
    /// against the store.
    pub fn validate(&self) -> Result<SignupDraft, FormErrors> {
        let mut errors = FormErrors::default();
        let username = self.username.trim();

        if username.is_empty() {
            errors.add("username", REQUIRED);
        } else if let Err(message) = check_username(username) {
            errors.add("username", message);
        }

        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        } else if self.password1.chars().count() < PASSWORD_MIN_LEN {
            errors.add(
                "password1",
                format!("This password is too short. It must contain at least {PASSWORD_MIN_LEN} characters."),
            );
        }

        if self.password2.is_empty() {
            errors.add("password2", REQUIRED);
        } else if self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }

        errors.into_result(SignupDraft {
            username: username.to_string(),
            password: self.password1.clone(),
        })
    }
}

fn check_username(username: &str) -> Result<(), &'static str> {
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err("Ensure this value has at most 150 characters.");
    }
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !username.chars().all(allowed) {
        return Err(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }
    if RESERVED_USERNAMES.contains(&username.to_lowercase().as_str()) {
        return Err("This username is reserved.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> Vec<Group> {
        vec![
            Group::new("Cats", "cats", "All about cats"),
            Group::new("Dogs", "dogs", "All about dogs"),
        ]
    }

    #[test]
    fn test_valid_post_with_group() {
        let choices = groups();
        let form = PostForm::new("  Hello there  ", Some(choices[1].id.to_string()));

        let draft = form.validate(&choices).unwrap();

        assert_eq!(draft.text, "Hello there");
        assert_eq!(draft.group_id, Some(choices[1].id));
    }

    #[test]
    fn test_empty_group_means_none() {
        let draft = PostForm::new("text", Some(String::new()))
            .validate(&groups())
            .unwrap();
        assert_eq!(draft.group_id, None);
    }

    #[test]
    fn test_blank_text_is_required() {
        let errors = PostForm::new("   ", None).validate(&groups()).unwrap_err();

        assert_eq!(errors.field("text"), [REQUIRED.to_string()]);
        assert!(errors.field("group").is_empty());
    }

    #[test]
    fn test_unknown_group_is_invalid_choice() {
        let form = PostForm::new("text", Some(Uuid::new_v4().to_string()));
        let errors = form.validate(&groups()).unwrap_err();
        assert_eq!(errors.field("group"), [INVALID_CHOICE.to_string()]);

        let form = PostForm::new("text", Some("not-a-uuid".to_string()));
        let errors = form.validate(&groups()).unwrap_err();
        assert_eq!(errors.field("group"), [INVALID_CHOICE.to_string()]);
    }

    #[test]
    fn test_signup_rules() {
        let ok = SignupForm {
            username: "stas.b".to_string(),
            password1: "long enough".to_string(),
            password2: "long enough".to_string(),
        };
        assert_eq!(ok.validate().unwrap().username, "stas.b");

        let bad = SignupForm {
            username: "new".to_string(),
            password1: "short".to_string(),
            password2: "other".to_string(),
        };
        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.field("username").len(), 1);
        assert_eq!(errors.field("password1").len(), 1);
        assert_eq!(errors.field("password2").len(), 1);
    }

    #[test]
    fn test_username_rejects_slashes() {
        let form = SignupForm {
            username: "a/b".to_string(),
            password1: "password123".to_string(),
            password2: "password123".to_string(),
        };
        assert!(!form.validate().unwrap_err().field("username").is_empty());
    }
}
