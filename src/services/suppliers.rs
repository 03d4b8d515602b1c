use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set, SqlErr,
};
use tracing::{info, instrument, warn};

use crate::{
    db::DbPool,
    dte::ExtractedIssuer,
    entities::{supplier, supplier_address},
    errors::ServiceError,
    services::non_empty,
};

/// Resolves document issuers to supplier rows, creating them on first
/// sighting and enriching them afterwards.
///
/// Merges follow an "only improve, never degrade" policy: the legal name is
/// replaced only by a longer one, every other field only fills a blank.
#[derive(Clone)]
pub struct SupplierReconciler {
    db: Arc<DbPool>,
}

/// Returns the replacement legal name, if the incoming one is more complete
/// than what is stored.
fn improved_legal_name(current: Option<&str>, incoming: &str) -> Option<String> {
    let incoming = incoming.trim();
    if incoming.is_empty() {
        return None;
    }
    let current_len = current.map_or(0, |c| c.chars().count());
    if incoming.chars().count() > current_len {
        Some(incoming.to_string())
    } else {
        None
    }
}

/// Returns the incoming value only when the stored one is blank.
fn fill_if_missing(current: Option<&str>, incoming: &str) -> Option<String> {
    let incoming = incoming.trim();
    if incoming.is_empty() || current.map_or(false, |c| !c.trim().is_empty()) {
        return None;
    }
    Some(incoming.to_string())
}

/// Derives the generated supplier code from a normalized tax id.
fn supplier_code_from_tax_id(tax_id: &str) -> String {
    tax_id.chars().filter(|c| *c != '-' && *c != '.').collect()
}

impl SupplierReconciler {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Finds the supplier for the extracted issuer by tax id, creating it
    /// if absent. The tax id is the required natural key.
    #[instrument(skip(self, issuer), fields(tax_id = %issuer.tax_id))]
    pub async fn reconcile(
        &self,
        issuer: &ExtractedIssuer,
    ) -> Result<supplier::Model, ServiceError> {
        let tax_id = issuer.tax_id.trim();
        if tax_id.is_empty() {
            return Err(ServiceError::ValidationError(
                "issuer tax id is required".to_string(),
            ));
        }

        if let Some(existing) = self.find_by_tax_id(tax_id).await? {
            return self.apply_merge(existing, issuer).await;
        }

        match self.create_supplier(tax_id, issuer).await {
            Ok(created) => Ok(created),
            Err(ServiceError::DatabaseError(err))
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
            {
                // Lost a concurrent first-sighting race; the winner's row
                // is authoritative, so merge into it instead.
                warn!(tax_id, "supplier insert hit unique constraint, retrying lookup");
                let existing = self
                    .find_by_tax_id(tax_id)
                    .await?
                    .ok_or(ServiceError::DatabaseError(err))?;
                self.apply_merge(existing, issuer).await
            }
            Err(err) => Err(err),
        }
    }

    pub async fn find_by_tax_id(
        &self,
        tax_id: &str,
    ) -> Result<Option<supplier::Model>, ServiceError> {
        let found = supplier::Entity::find()
            .filter(supplier::Column::TaxId.eq(tax_id))
            .one(&*self.db)
            .await?;
        Ok(found)
    }

    async fn apply_merge(
        &self,
        existing: supplier::Model,
        issuer: &ExtractedIssuer,
    ) -> Result<supplier::Model, ServiceError> {
        let mut update = existing.clone().into_active_model();
        let mut changed = false;

        if let Some(name) = improved_legal_name(existing.legal_name.as_deref(), &issuer.legal_name)
        {
            update.name = Set(name.clone());
            update.legal_name = Set(Some(name));
            changed = true;
        }
        if let Some(activity) = fill_if_missing(
            existing.business_activity.as_deref(),
            &issuer.business_activity,
        ) {
            update.business_activity = Set(Some(activity));
            changed = true;
        }
        if let Some(phone) = fill_if_missing(existing.phone.as_deref(), &issuer.phone) {
            update.phone = Set(Some(phone));
            changed = true;
        }
        if let Some(email) = fill_if_missing(existing.email.as_deref(), &issuer.email) {
            update.email = Set(Some(email));
            changed = true;
        }

        let incoming_code = |index: usize| issuer.activity_codes.get(index).map(String::as_str);
        if let Some(code) = fill_if_missing(
            existing.activity_code_1.as_deref(),
            incoming_code(0).unwrap_or(""),
        ) {
            update.activity_code_1 = Set(Some(code));
            changed = true;
        }
        if let Some(code) = fill_if_missing(
            existing.activity_code_2.as_deref(),
            incoming_code(1).unwrap_or(""),
        ) {
            update.activity_code_2 = Set(Some(code));
            changed = true;
        }
        if let Some(code) = fill_if_missing(
            existing.activity_code_3.as_deref(),
            incoming_code(2).unwrap_or(""),
        ) {
            update.activity_code_3 = Set(Some(code));
            changed = true;
        }
        if let Some(code) = fill_if_missing(
            existing.activity_code_4.as_deref(),
            incoming_code(3).unwrap_or(""),
        ) {
            update.activity_code_4 = Set(Some(code));
            changed = true;
        }

        if !changed {
            return Ok(existing);
        }

        update.updated_at = Set(Some(Utc::now()));
        let updated = update.update(&*self.db).await?;
        info!(supplier_id = updated.id, "supplier enriched from ingested document");
        Ok(updated)
    }

    async fn create_supplier(
        &self,
        tax_id: &str,
        issuer: &ExtractedIssuer,
    ) -> Result<supplier::Model, ServiceError> {
        let now = Utc::now();

        let new_supplier = supplier::ActiveModel {
            supplier_code: Set(supplier_code_from_tax_id(tax_id)),
            tax_id: Set(tax_id.to_string()),
            name: Set(issuer.legal_name.clone()),
            legal_name: Set(non_empty(&issuer.legal_name)),
            business_activity: Set(non_empty(&issuer.business_activity)),
            activity_code_1: Set(issuer.activity_codes.first().cloned()),
            activity_code_2: Set(issuer.activity_codes.get(1).cloned()),
            activity_code_3: Set(issuer.activity_codes.get(2).cloned()),
            activity_code_4: Set(issuer.activity_codes.get(3).cloned()),
            phone: Set(non_empty(&issuer.phone)),
            email: Set(non_empty(&issuer.email)),
            country: Set("Chile".to_string()),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(None),
            ..Default::default()
        };

        let created = new_supplier.insert(&*self.db).await?;
        info!(supplier_id = created.id, tax_id, "supplier created from ingested document");

        // The fiscal address is written once, together with the supplier.
        if !issuer.street_address.trim().is_empty() {
            let address = supplier_address::ActiveModel {
                supplier_id: Set(created.id),
                address_type: Set("FISCAL".to_string()),
                street_address: Set(issuer.street_address.clone()),
                commune: Set(non_empty(&issuer.commune)),
                city: Set(non_empty(&issuer.city)),
                country: Set("Chile".to_string()),
                is_primary: Set(true),
                active: Set(true),
                created_at: Set(now),
                ..Default::default()
            };
            address.insert(&*self.db).await?;
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_name_only_replaced_by_longer_one() {
        assert_eq!(
            improved_legal_name(None, "ACME SPA"),
            Some("ACME SPA".to_string())
        );
        assert_eq!(
            improved_legal_name(Some("ACME"), "ACME SPA"),
            Some("ACME SPA".to_string())
        );
        // Shorter or equal incoming names never win
        assert_eq!(improved_legal_name(Some("ACME SPA"), "ACME"), None);
        assert_eq!(improved_legal_name(Some("ACME SPA"), "ACME SPA"), None);
        assert_eq!(improved_legal_name(Some("ACME SPA"), ""), None);
    }

    #[test]
    fn fill_if_missing_never_overwrites() {
        assert_eq!(fill_if_missing(None, "x"), Some("x".to_string()));
        assert_eq!(fill_if_missing(Some(""), "x"), Some("x".to_string()));
        assert_eq!(fill_if_missing(Some("kept"), "x"), None);
        assert_eq!(fill_if_missing(None, ""), None);
        assert_eq!(fill_if_missing(None, "  "), None);
    }

    #[test]
    fn supplier_code_strips_punctuation() {
        assert_eq!(supplier_code_from_tax_id("76543210-K"), "76543210K");
        assert_eq!(supplier_code_from_tax_id("76.543.210-K"), "76543210K");
    }
}
