use std::time::Duration;

use crate::api::{ApiClient, DashboardTransport};
use crate::error::DashboardError;
use crate::status::{Delay, Notice, NoticeKind, StatusLine};
use crate::view::DashboardView;

pub struct PromptPanel<T, V> {
    client: ApiClient<T>,
    view: V,
    status: StatusLine<V>,
}

impl<T, V> PromptPanel<T, V>
where
    T: DashboardTransport,
    V: DashboardView,
{
    pub fn new(client: ApiClient<T>, view: V, status: StatusLine<V>) -> Self {
        Self {
            client,
            view,
            status,
        }
    }

    pub fn status(&self) -> &StatusLine<V> {
        &self.status
    }

    /// Replaces the editable field with the server's prompt, or clears it
    /// when the reply carries none.
    pub async fn load_prompt(&self) -> Result<(), DashboardError> {
        let response = self.client.fetch_prompt().await?;
        if let Some(error) = response.error.as_deref() {
            tracing::warn!(error, "prompt endpoint reported an error");
        }
        let prompt = response.prompt.unwrap_or_default();
        tracing::debug!(chars = prompt.chars().count(), "prompt loaded");
        self.view.set_prompt_text(&prompt);
        Ok(())
    }

    /// Sends the field's current text. The field itself is never rewritten.
    pub async fn save_prompt(&self) -> Result<Notice, DashboardError> {
        let text = self.view.prompt_text();
        let response = self.client.save_prompt(&text).await?;
        if response.succeeded() {
            tracing::info!("prompt saved");
            Ok(self.status.show(NoticeKind::Saved))
        } else {
            tracing::warn!(error = response.error.as_deref(), "prompt save rejected");
            Ok(self.status.show(NoticeKind::SaveFailed))
        }
    }

    /// Applies the named preset. A failed reply leaves the field untouched even
    /// if it carries a `prompt`.
    pub async fn apply_preset(&self, name: &str) -> Result<Notice, DashboardError> {
        let response = self.client.apply_preset(name).await?;
        if response.succeeded() {
            tracing::info!(preset = name, "preset applied");
            self.view
                .set_prompt_text(response.prompt.as_deref().unwrap_or_default());
            Ok(self.status.show(NoticeKind::PresetApplied))
        } else {
            tracing::warn!(
                preset = name,
                error = response.error.as_deref(),
                "preset rejected"
            );
            Ok(self.status.show(NoticeKind::PresetFailed))
        }
    }

    /// Saves, then clears the resulting notice once `after` has elapsed
    /// unless a newer notice replaced it.
    pub async fn save_prompt_and_dismiss<D: Delay>(
        &self,
        delay: &D,
        after: Duration,
    ) -> Result<Notice, DashboardError> {
        let notice = self.save_prompt().await?;
        self.status.dismiss_after(notice.token, delay, after).await;
        Ok(notice)
    }

    pub async fn apply_preset_and_dismiss<D: Delay>(
        &self,
        name: &str,
        delay: &D,
        after: Duration,
    ) -> Result<Notice, DashboardError> {
        let notice = self.apply_preset(name).await?;
        self.status.dismiss_after(notice.token, delay, after).await;
        Ok(notice)
    }
}
