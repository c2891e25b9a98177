//! Reader context for public read endpoints.
//!
//! Every list/get on story content accepts `?lang=` and `?progress=`. The
//! [`Reader`] extractor resolves both once per request: the language for the
//! translation overlay and the [`SpoilerGate`] from an explicit progress, or
//! else the stored progress of the signed-in caller.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use usogui_core::language::{apply_overlay, Language, Translatable, TranslatableEntity};
use usogui_core::spoiler::{Gated, SpoilerGate, SpoilerGated};
use usogui_db::repositories::{TranslationRepo, UserRepo};
use usogui_db::DbPool;

use super::auth::{AuthUser, OptionalAuthUser};
use crate::error::{AppError, AppResult};
use crate::query::ReaderParams;
use crate::state::AppState;

#[derive(Debug, Clone, Copy)]
pub struct Reader {
    pub user: Option<AuthUser>,
    pub language: Language,
    pub gate: SpoilerGate,
}

impl FromRequestParts<AppState> for Reader {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let OptionalAuthUser(user) = OptionalAuthUser::from_request_parts(parts, state).await?;
        let Query(params) = Query::<ReaderParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let language = Language::resolve(params.lang.as_deref())?;

        // Stored progress of 0 means the reader never set it.
        let stored = match (params.progress, user) {
            (None, Some(user)) => UserRepo::find_by_id(&state.pool, user.user_id)
                .await?
                .map(|u| u.user_progress)
                .filter(|p| *p > 0),
            _ => None,
        };
        let gate = SpoilerGate::resolve(params.progress, stored)?;

        Ok(Reader {
            user,
            language,
            gate,
        })
    }
}

impl Reader {
    /// Overlay translated text onto `items` in place.
    pub async fn localize<T: Translatable>(
        &self,
        pool: &DbPool,
        entity: TranslatableEntity,
        items: &mut [T],
    ) -> AppResult<()> {
        if self.language.is_canonical() || items.is_empty() {
            return Ok(());
        }
        let ids: Vec<_> = items.iter().map(Translatable::translation_key).collect();
        let translations = TranslationRepo::overlay_map(pool, entity, self.language, &ids).await?;
        apply_overlay(items, &translations);
        Ok(())
    }

    /// Localize, then gate, a page of entities.
    pub async fn present<T: Translatable + SpoilerGated>(
        &self,
        pool: &DbPool,
        entity: TranslatableEntity,
        mut items: Vec<T>,
    ) -> AppResult<Vec<Gated<T>>> {
        self.localize(pool, entity, &mut items).await?;
        Ok(self.gate.apply_all(items))
    }

    /// Single-entity form of [`present`](Self::present).
    pub async fn present_one<T: Translatable + SpoilerGated>(
        &self,
        pool: &DbPool,
        entity: TranslatableEntity,
        item: T,
    ) -> AppResult<Gated<T>> {
        let mut items = self.present(pool, entity, vec![item]).await?;
        items
            .pop()
            .ok_or_else(|| AppError::InternalError("presented item vanished".into()))
    }
}
