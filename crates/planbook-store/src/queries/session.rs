//! Operations on the signed-in user slot.

use anyhow::Result;
use tracing::info;

use crate::config::StoreConfig;
use crate::models::User;
use crate::slot::SlotStore;

/// Load the signed-in user, if any.
pub async fn load_user(store: &SlotStore) -> Result<Option<User>> {
    store.read(StoreConfig::USER_SLOT).await
}

/// Persist the signed-in user, replacing any previous identity.
pub async fn save_user(store: &SlotStore, user: &User) -> Result<()> {
    store.write(StoreConfig::USER_SLOT, user).await?;
    info!(user_id = %user.id, "user signed in");
    Ok(())
}

/// Forget the signed-in user.
pub async fn clear_user(store: &SlotStore) -> Result<()> {
    store.erase(StoreConfig::USER_SLOT).await?;
    info!("user signed out");
    Ok(())
}
