//! Page contexts - what each HTML view would hand to its template, as JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorView {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupView {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub id: String,
    pub text: String,
    /// RFC 3339 timestamp.
    pub pub_date: String,
    pub author: AuthorView,
    pub group: Option<GroupView>,
    /// Stored media path, e.g. `posts/small.gif`.
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: String,
    pub text: String,
    pub created: String,
    pub author: AuthorView,
}

/// One page of a listing together with its navigation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView<T> {
    pub object_list: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<u64>,
    pub previous_page_number: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexPage {
    pub page_obj: PageView<PostView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPage {
    pub group: GroupView,
    pub page_obj: PageView<PostView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePage {
    pub author: AuthorView,
    pub post_count: u64,
    pub following: bool,
    pub page_obj: PageView<PostView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowPage {
    pub page_obj: PageView<PostView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetailPage {
    pub post: PostView,
    pub author_post_count: u64,
    pub comments: Vec<CommentView>,
    pub form: FormView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFormPage {
    pub form: FormView,
    pub is_edit: bool,
    /// Id of the post being edited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginPage {
    pub form: FormView,
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupPage {
    pub form: FormView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedOutPage {
    pub logged_out: bool,
}

/// A form descriptor: fields in display order plus errors by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormView {
    pub fields: Vec<FieldView>,
    pub errors: BTreeMap<String, Vec<String>>,
}

impl FormView {
    pub fn new(fields: Vec<FieldView>) -> Self {
        Self {
            fields,
            errors: BTreeMap::new(),
        }
    }

    pub fn with_errors(mut self, errors: BTreeMap<String, Vec<String>>) -> Self {
        self.errors = errors;
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    /// `textarea`, `select`, `file`, `text`, `email` or `password`.
    pub kind: String,
    pub required: bool,
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<ChoiceView>,
}

impl FieldView {
    pub fn new(name: &str, label: &str, kind: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            help_text: None,
            kind: kind.to_string(),
            required,
            value: None,
            choices: Vec::new(),
        }
    }

    pub fn with_help(mut self, help_text: &str) -> Self {
        self.help_text = Some(help_text.to_string());
        self
    }

    pub fn with_value(mut self, value: Option<String>) -> Self {
        self.value = value;
        self
    }

    pub fn with_choices(mut self, choices: Vec<ChoiceView>) -> Self {
        self.choices = choices;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceView {
    pub value: String,
    pub label: String,
}
