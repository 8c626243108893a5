//! Contact form state
//!
//! Holds the four inputs, the hovered field, and the two liquid borders of
//! the form. Submission hands the current tuple to a [`SubmissionSink`];
//! delivery is somebody else's problem.

use std::fmt;
use std::str::FromStr;

use atelier_animation::presets::MorphPreset;
use atelier_animation::{CornerRadii, LiquidMorph, ShapeTransition};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteError};

/// Kind of shoot being enquired about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Portrait,
    Family,
    Creative,
    Editorial,
}

impl SessionType {
    /// Options of the select, in display order
    pub const ALL: [SessionType; 4] = [
        SessionType::Portrait,
        SessionType::Family,
        SessionType::Creative,
        SessionType::Editorial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Portrait => "portrait",
            SessionType::Family => "family",
            SessionType::Creative => "creative",
            SessionType::Editorial => "editorial",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = SiteError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SiteError::UnknownSessionType(s.to_string()))
    }
}

/// Form inputs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    SessionType,
    Message,
}

/// What the sink receives on submit
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub session_type: Option<SessionType>,
    pub message: String,
}

/// Receiver of submitted enquiries
pub trait SubmissionSink {
    fn submit(&mut self, submission: &ContactSubmission);
}

/// Sink that only logs the enquiry
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingSink;

impl SubmissionSink for LoggingSink {
    fn submit(&mut self, submission: &ContactSubmission) {
        tracing::info!(
            session_type = ?submission.session_type,
            name_len = submission.name.len(),
            email_len = submission.email.len(),
            message_len = submission.message.len(),
            "contact form submitted"
        );
        tracing::debug!(name = %submission.name, email = %submission.email, "contact details");
    }
}

impl<F: FnMut(&ContactSubmission)> SubmissionSink for F {
    fn submit(&mut self, submission: &ContactSubmission) {
        self(submission)
    }
}

#[derive(Debug)]
pub struct ContactForm {
    values: ContactSubmission,
    hovered: Option<Field>,
    message_morph: LiquidMorph,
    message_hover: ShapeTransition,
    button_morph: LiquidMorph,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactForm {
    pub fn new() -> Self {
        Self {
            values: ContactSubmission::default(),
            hovered: None,
            message_morph: MorphPreset::message_field(),
            message_hover: MorphPreset::message_hover(),
            button_morph: MorphPreset::submit_button(),
        }
    }

    pub fn values(&self) -> &ContactSubmission {
        &self.values
    }

    /// Text of a field as the input shows it
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.values.name,
            Field::Email => &self.values.email,
            Field::SessionType => self.values.session_type.map_or("", |t| t.as_str()),
            Field::Message => &self.values.message,
        }
    }

    /// Replace the content of a field.
    ///
    /// The session type accepts one of the offered options, or an empty
    /// string for the placeholder. Anything else is rejected and the field
    /// keeps its value.
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<()> {
        match field {
            Field::Name => self.values.name = value.to_string(),
            Field::Email => self.values.email = value.to_string(),
            Field::SessionType => self.select_session_type(value)?,
            Field::Message => {
                self.values.message = value.to_string();
                self.sync_message_morph();
            }
        }
        Ok(())
    }

    pub fn select_session_type(&mut self, value: &str) -> Result<()> {
        self.values.session_type = if value.trim().is_empty() {
            None
        } else {
            Some(value.parse()?)
        };
        Ok(())
    }

    pub fn hover(&mut self, field: Field) {
        self.hovered = Some(field);
        self.message_hover.set_active(field == Field::Message);
    }

    /// Clears only if `field` still holds the hover
    pub fn unhover(&mut self, field: Field) {
        if self.hovered == Some(field) {
            self.hovered = None;
            self.message_hover.set_active(false);
        }
    }

    pub fn hovered(&self) -> Option<Field> {
        self.hovered
    }

    /// Underline stays drawn while hovered or once the field has content
    pub fn underline_visible(&self, field: Field) -> bool {
        self.hovered == Some(field) || !self.value(field).is_empty()
    }

    /// Hand the current values to `sink`. The form keeps its content.
    pub fn submit(&mut self, sink: &mut dyn SubmissionSink) -> ContactSubmission {
        let submission = self.values.clone();
        sink.submit(&submission);
        submission
    }

    // The message box only wobbles while it has something in it
    fn sync_message_morph(&mut self) {
        let filled = !self.values.message.is_empty();
        if filled && !self.message_morph.is_running() {
            self.message_morph.start();
        } else if !filled && self.message_morph.is_running() {
            self.message_morph.cancel();
        }
    }

    pub fn tick(&mut self, dt_ms: f32) {
        self.message_morph.tick(dt_ms);
        self.message_hover.tick(dt_ms);
        self.button_morph.tick(dt_ms);
    }

    /// Message box border: the content morph, pulled toward the hover shape
    /// as far as the hover blend has run
    pub fn message_shape(&self, width: f32, height: f32) -> CornerRadii {
        let base = self.message_morph.shape(width, height);
        self.message_hover.blend_over(&base, width, height)
    }

    pub fn button_shape(&self, width: f32, height: f32) -> CornerRadii {
        self.button_morph.shape(width, height)
    }

    pub fn is_message_morphing(&self) -> bool {
        self.message_morph.is_running()
    }

    /// Empty the form and stop the borders (view teardown)
    pub fn reset(&mut self) {
        self.values = ContactSubmission::default();
        self.hovered = None;
        self.message_morph.cancel();
        self.message_hover.reset();
        self.button_morph.cancel();
    }
}
