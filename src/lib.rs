#![warn(missing_docs)]
//! Diya - festive Deepavali portraits from one or two photos.
//!
//! A [`Session`] holds the mode, the two photo slots and the generation
//! lifecycle. A [`PortraitProvider`] (Gemini by default) does the remote call.
//!
//! # Quick Start
//!
//! ```no_run
//! use diya::{intake, GeminiProvider, Session, SelectionMode, Slot, StatusView};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> diya::Result<()> {
//!     let provider = GeminiProvider::builder().build()?;
//!
//!     let mut session = Session::new();
//!     session.set_mode(SelectionMode::Couple);
//!     session.set_image(Slot::PersonOne, intake::read_file("me.jpg")?);
//!     session.set_image(Slot::PersonTwo, intake::read_file("partner.jpg")?);
//!
//!     session.generate(&provider).await;
//!     if let StatusView::Success(image) = session.view() {
//!         image.save("portrait.png")?;
//!     }
//!     Ok(())
//! }
//! ```

mod error;
pub mod image;
pub mod intake;
pub mod prompt;
pub mod session;
pub mod view;

// Re-export error types at crate root
pub use error::{DiyaError, Result};

pub use image::providers::{GeminiModel, GeminiProvider, GeminiProviderBuilder};
pub use image::{
    EncodedImage, GeneratedImage, GenerationMetadata, GenerationRequest, ImageFormat,
    PortraitProvider,
};
pub use prompt::{build_prompt, SelectionMode};
pub use session::{GenerationFailure, GenerationState, Session, Slot, TriggerRefused};
pub use view::{StatusView, TriggerView};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{DiyaError, Result};
    pub use crate::image::providers::GeminiProvider;
    pub use crate::image::{EncodedImage, GeneratedImage, PortraitProvider};
    pub use crate::prompt::SelectionMode;
    pub use crate::session::{Session, Slot};
    pub use crate::view::StatusView;
}
