//! Notification content model and its JSON wire envelope.
//!
//! [`Payload`] is the user-facing model; [`Envelope`] is the exact JSON
//! shape the push service expects: an `aps` object with a nested `alert`,
//! a top-level `threadId`, and any extra string fields flattened at the
//! top level. An empty payload is valid (a content-available-only silent
//! push carries no alert text at all).

use std::collections::HashMap;

use serde::Serialize;

/// Push notification content.
///
/// All fields are optional; equality is full structural equality across
/// every field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    /// Short string describing the purpose of the notification.
    pub title: Option<String>,
    /// Secondary description of the reason for the alert.
    pub subtitle: Option<String>,
    /// The text of the alert message.
    pub body: Option<String>,
    /// Key to a localized title string, formatted with `title_loc_args`.
    pub title_loc_key: Option<String>,
    /// Variable values substituted into the localized title.
    pub title_loc_args: Option<Vec<String>>,
    /// Key to a localized action-button title.
    pub action_loc_key: Option<String>,
    /// Key to a localized alert-message string, formatted with
    /// `body_loc_args`.
    pub body_loc_key: Option<String>,
    /// Variable values substituted into the localized body.
    pub body_loc_args: Option<Vec<String>>,
    /// Launch image filename in the app bundle.
    pub launch_image: Option<String>,
    /// Number to display as the app icon badge.
    pub badge: Option<u32>,
    /// Sound file name in the app bundle; `default` plays the system sound.
    pub sound: Option<String>,
    /// Notification category for actionable notifications.
    pub category: Option<String>,
    /// Silent push: wakes the app for background work without an alert.
    pub content_available: bool,
    /// Content can be modified by a notification service extension.
    pub mutable_content: bool,
    /// Notifications with the same thread id are visually grouped.
    pub thread_id: Option<String>,
    /// Extra key-value pairs merged into the top level of the JSON body.
    pub extra: HashMap<String, String>,
}

impl Payload {
    /// Empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Body-only alert.
    pub fn plain(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            ..Self::default()
        }
    }

    /// Title and body alert.
    pub fn alert(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: Some(body.into()),
            ..Self::default()
        }
    }

    /// Title, subtitle, and body alert.
    pub fn alert_with_subtitle(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            subtitle: Some(subtitle.into()),
            body: Some(body.into()),
            ..Self::default()
        }
    }

    /// Alert with a badge update.
    pub fn badged(title: impl Into<String>, body: impl Into<String>, badge: u32) -> Self {
        Self {
            title: Some(title.into()),
            body: Some(body.into()),
            badge: Some(badge),
            ..Self::default()
        }
    }

    /// Ready-made content-available payload for silent pushes.
    pub fn silent() -> Self {
        Self {
            content_available: true,
            ..Self::default()
        }
    }
}

/// Alert sub-object with the externally mandated key names.
#[derive(Serialize)]
struct Alert<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subtitle: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a str>,
    #[serde(rename = "title-loc-key", skip_serializing_if = "Option::is_none")]
    title_loc_key: Option<&'a str>,
    #[serde(rename = "title-loc-args", skip_serializing_if = "Option::is_none")]
    title_loc_args: Option<&'a [String]>,
    #[serde(rename = "action-loc-key", skip_serializing_if = "Option::is_none")]
    action_loc_key: Option<&'a str>,
    #[serde(rename = "body-loc-key", skip_serializing_if = "Option::is_none")]
    body_loc_key: Option<&'a str>,
    #[serde(rename = "body-loc-args", skip_serializing_if = "Option::is_none")]
    body_loc_args: Option<&'a [String]>,
    #[serde(rename = "launch-image", skip_serializing_if = "Option::is_none")]
    launch_image: Option<&'a str>,
}

/// The `aps` object.
#[derive(Serialize)]
struct Aps<'a> {
    alert: Alert<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    badge: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sound: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    #[serde(rename = "contentAvailable")]
    content_available: bool,
    #[serde(rename = "hasMutableContent")]
    has_mutable_content: bool,
}

/// Full request body: `aps`, `threadId`, and flattened extras.
#[derive(Serialize)]
pub(crate) struct Envelope<'a> {
    aps: Aps<'a>,
    #[serde(rename = "threadId", skip_serializing_if = "Option::is_none")]
    thread_id: Option<&'a str>,
    #[serde(flatten)]
    extra: &'a HashMap<String, String>,
}

impl<'a> Envelope<'a> {
    pub(crate) fn new(payload: &'a Payload) -> Self {
        Self {
            aps: Aps {
                alert: Alert {
                    title: payload.title.as_deref(),
                    subtitle: payload.subtitle.as_deref(),
                    body: payload.body.as_deref(),
                    title_loc_key: payload.title_loc_key.as_deref(),
                    title_loc_args: payload.title_loc_args.as_deref(),
                    action_loc_key: payload.action_loc_key.as_deref(),
                    body_loc_key: payload.body_loc_key.as_deref(),
                    body_loc_args: payload.body_loc_args.as_deref(),
                    launch_image: payload.launch_image.as_deref(),
                },
                badge: payload.badge,
                sound: payload.sound.as_deref(),
                category: payload.category.as_deref(),
                content_available: payload.content_available,
                has_mutable_content: payload.mutable_content,
            },
            thread_id: payload.thread_id.as_deref(),
            extra: &payload.extra,
        }
    }
}
