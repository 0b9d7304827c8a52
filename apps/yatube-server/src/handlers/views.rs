//! Domain rows to page-context DTOs.

use std::collections::BTreeMap;

use yatube_core::Page;
use yatube_core::domain::{Group, Post, User};
use yatube_core::forms::FormErrors;
use yatube_core::services::{CommentEntry, PostEntry};
use yatube_shared::dto::{
    AuthorView, ChoiceView, CommentView, FieldView, FormView, GroupView, PageView, PostView,
};

pub fn author(user: &User) -> AuthorView {
    AuthorView {
        id: user.id.to_string(),
        username: user.username.clone(),
    }
}

pub fn group(group: &Group) -> GroupView {
    GroupView {
        id: group.id.to_string(),
        title: group.title.clone(),
        slug: group.slug.clone(),
        description: group.description.clone(),
    }
}

pub fn post(entry: &PostEntry) -> PostView {
    PostView {
        id: entry.post.id.to_string(),
        text: entry.post.text.clone(),
        pub_date: entry.post.pub_date.to_rfc3339(),
        author: author(&entry.author),
        group: entry.group.as_ref().map(group),
        image: entry.post.image.clone(),
    }
}

pub fn comment(entry: &CommentEntry) -> CommentView {
    CommentView {
        id: entry.comment.id.to_string(),
        text: entry.comment.text.clone(),
        created: entry.comment.created.to_rfc3339(),
        author: author(&entry.author),
    }
}

pub fn page(page: &Page<PostEntry>) -> PageView<PostView> {
    PageView {
        object_list: page.items.iter().map(post).collect(),
        number: page.number,
        num_pages: page.num_pages,
        count: page.total,
        has_next: page.has_next(),
        has_previous: page.has_previous(),
        next_page_number: page.has_next().then(|| page.number + 1),
        previous_page_number: page.has_previous().then(|| page.number - 1),
    }
}

/// Values a post form is shown with.
#[derive(Debug, Default)]
pub struct PostFormValues {
    pub text: Option<String>,
    pub group: Option<String>,
    pub image: Option<String>,
}

impl From<&Post> for PostFormValues {
    fn from(post: &Post) -> Self {
        Self {
            text: Some(post.text.clone()),
            group: post.group_id.map(|id| id.to_string()),
            image: post.image.clone(),
        }
    }
}

pub fn post_form(groups: &[Group], values: PostFormValues, errors: FormErrors) -> FormView {
    let mut choices = vec![ChoiceView {
        value: String::new(),
        label: "---------".to_string(),
    }];
    choices.extend(groups.iter().map(|g| ChoiceView {
        value: g.id.to_string(),
        label: g.to_string(),
    }));

    FormView::new(vec![
        FieldView::new("text", "Текст поста*", "textarea", true)
            .with_help("Текст нового поста")
            .with_value(values.text),
        FieldView::new("group", "Группа поста", "select", false)
            .with_help("Группа, к которой будет относиться пост")
            .with_value(values.group)
            .with_choices(choices),
        FieldView::new("image", "Изображение", "file", false)
            .with_help("Поддерживаются только форматы картинки")
            .with_value(values.image),
    ])
    .with_errors(errors.into_inner())
}

pub fn comment_form() -> FormView {
    FormView::new(vec![
        FieldView::new("text", "Текст комментария", "textarea", true)
            .with_help("Текст нового комментария"),
    ])
}

pub fn login_form(username: Option<String>, errors: BTreeMap<String, Vec<String>>) -> FormView {
    FormView::new(vec![
        FieldView::new("username", "Username", "text", true).with_value(username),
        FieldView::new("password", "Password", "password", true),
    ])
    .with_errors(errors)
}

pub fn signup_form(
    username: Option<String>,
    email: Option<String>,
    errors: BTreeMap<String, Vec<String>>,
) -> FormView {
    FormView::new(vec![
        FieldView::new("username", "Username", "text", true)
            .with_help("Required. 150 characters or fewer. Letters, digits and @/./+/-/_ only.")
            .with_value(username),
        FieldView::new("email", "Email address", "email", true).with_value(email),
        FieldView::new("password1", "Password", "password", true),
        FieldView::new("password2", "Password confirmation", "password", true)
            .with_help("Enter the same password as before, for verification."),
    ])
    .with_errors(errors)
}
