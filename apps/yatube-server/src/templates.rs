//! Askama templates for the Yatube pages.

use askama::Template;

use yatube_core::Page;
use yatube_core::domain::{Group, Post, User};
use yatube_core::forms::{FormErrors, PostForm};

/// Detail page of a post.
pub fn post_url(username: &str, post_id: i64) -> String {
    format!("/{}/{}/", username, post_id)
}

/// Group name and link shown on a post.
#[derive(Debug, Clone)]
pub struct GroupLink {
    pub title: String,
    pub slug: String,
}

/// A post as shown in listings and on its own page.
#[derive(Debug, Clone)]
pub struct PostCard {
    pub id: i64,
    pub text: String,
    pub author: String,
    pub group: Option<GroupLink>,
    pub published: String,
}

impl PostCard {
    pub fn new(post: Post, author: &User, group: Option<&Group>) -> Self {
        Self {
            id: post.id,
            text: post.text,
            author: author.username.clone(),
            group: group.map(|g| GroupLink {
                title: g.title.clone(),
                slug: g.slug.clone(),
            }),
            published: post.created_at.format("%d %b %Y %H:%M").to_string(),
        }
    }

    pub fn url(&self) -> String {
        post_url(&self.author, self.id)
    }
}

/// Index page template
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub viewer: Option<String>,
    pub page: Page<PostCard>,
}

/// Group listing template
#[derive(Template)]
#[template(path = "group.html")]
pub struct GroupTemplate {
    pub viewer: Option<String>,
    pub group: Group,
    pub page: Page<PostCard>,
}

/// Author profile template
#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub viewer: Option<String>,
    pub author: String,
    pub page: Page<PostCard>,
}

/// Single post template
#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub viewer: Option<String>,
    pub post: PostCard,
    pub author_post_count: u64,
    pub can_edit: bool,
}

/// One `<option>` of the group select.
#[derive(Debug, Clone)]
pub struct GroupChoice {
    pub id: String,
    pub title: String,
    pub selected: bool,
}

/// New and edit post form template
#[derive(Template)]
#[template(path = "new.html")]
pub struct PostFormTemplate {
    pub viewer: Option<String>,
    pub editing: bool,
    pub action: String,
    pub text: String,
    pub text_errors: Vec<String>,
    pub group_errors: Vec<String>,
    pub choices: Vec<GroupChoice>,
}

impl PostFormTemplate {
    pub fn new(
        viewer: Option<String>,
        action: String,
        editing: bool,
        form: &PostForm,
        errors: &FormErrors,
        groups: &[Group],
    ) -> Self {
        let selected = form.group.trim();
        let choices = groups
            .iter()
            .map(|g| {
                let id = g.id.to_string();
                GroupChoice {
                    selected: id == selected,
                    id,
                    title: g.title.clone(),
                }
            })
            .collect();

        Self {
            viewer,
            editing,
            action,
            text: form.text.clone(),
            text_errors: errors.field("text").to_vec(),
            group_errors: errors.field("group").to_vec(),
            choices,
        }
    }
}

/// Login form template
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub viewer: Option<String>,
    pub username: String,
    pub next: String,
    pub error: Option<String>,
}

/// Signup form template
#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub viewer: Option<String>,
    pub username: String,
    pub username_errors: Vec<String>,
    pub password1_errors: Vec<String>,
    pub password2_errors: Vec<String>,
}

impl SignupTemplate {
    pub fn new(username: String, errors: &FormErrors) -> Self {
        Self {
            viewer: None,
            username,
            username_errors: errors.field("username").to_vec(),
            password1_errors: errors.field("password1").to_vec(),
            password2_errors: errors.field("password2").to_vec(),
        }
    }
}

/// Error page template
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub viewer: Option<String>,
    pub status: u16,
    pub title: String,
    pub detail: String,
}
