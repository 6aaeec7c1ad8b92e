/*!
 * The translation call the pipeline depends on.
 */

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::TranslationError;

/// Translates one paragraph of plain text.
///
/// Input never contains paragraph or line breaks. An `Ok` answer may still
/// be empty or an echo of the input; classifying those is up to the caller.
#[async_trait]
pub trait TranslationClient: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String, TranslationError>;
}

#[async_trait]
impl<T: TranslationClient + ?Sized> TranslationClient for Arc<T> {
    async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        (**self).translate(text).await
    }
}
