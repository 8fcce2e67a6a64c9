//! Slide Model

use serde::{Deserialize, Serialize};

use super::ImagePayload;

/// Homepage slide/banner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    pub id: i64,
    pub icon: Option<String>,
    pub title: String,
    pub description: String,
    /// `data:<mime>;base64,<data>` URL, ready for an `<img src>`
    pub image: Option<String>,
    pub alt: Option<String>,
}

/// Create slide payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideCreate {
    pub icon: Option<String>,
    pub title: String,
    pub description: String,
    pub image: ImagePayload,
    pub alt: Option<String>,
}

/// Update slide payload (image kept when omitted)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideUpdate {
    pub icon: Option<String>,
    pub title: String,
    pub description: String,
    pub image: Option<ImagePayload>,
    pub alt: Option<String>,
}
