//! Product lifecycle: creation, custody transfer, certification, deactivation

use tracing::{info, warn};

use custody_core::{
    policy, EntryKind, ParticipantId, Product, ProductId, RegistryError, Result, SequenceNumber,
};

use super::ledger::PendingEntry;
use super::CustodyRegistry;
use crate::storage::Changeset;

/// Note recorded on every creation entry
pub const CREATION_NOTE: &str = "Product created";

fn product_not_found(id: &ProductId) -> RegistryError {
    RegistryError::NotFound(format!("product '{}'", id))
}

impl CustodyRegistry {
    /// Create a product held by `caller`
    ///
    /// The caller must be verified. Writes the product together with its
    /// creation entry and returns that entry's sequence number.
    pub async fn create_product(
        &self,
        caller: &ParticipantId,
        product_id: ProductId,
        name: impl Into<String>,
        description: impl Into<String>,
        origin: impl Into<String>,
    ) -> Result<SequenceNumber> {
        let guard = self.lock().await;

        let caller_record = self.store.get_participant(caller).await?;
        policy::authorize_create(caller, caller_record.as_ref())?;

        if self.store.get_product(&product_id).await?.is_some() {
            warn!(product_id = %product_id, caller = %caller, "Product already registered");
            return Err(RegistryError::AlreadyExists(format!("product '{}'", product_id)));
        }

        let now = self.clock.now();
        let product = Product {
            id: product_id,
            name: name.into(),
            description: description.into(),
            origin: origin.into(),
            created_at: now,
            custodian: caller.clone(),
            active: true,
        };

        let pending = PendingEntry {
            product_id: product.id.clone(),
            kind: EntryKind::Creation,
            from: self.config.administrator.clone(),
            to: caller.clone(),
            timestamp: now,
            location: product.origin.clone(),
            notes: CREATION_NOTE.to_string(),
        };

        info!(product_id = %product.id, custodian = %caller, "Creating product");
        self.append(&guard, Changeset::new().with_product(product), pending)
            .await
    }

    /// Hand a product to `new_custodian`
    ///
    /// Requires the caller to be the verified current custodian of an active
    /// product and the recipient to be verified.
    pub async fn transfer_product(
        &self,
        caller: &ParticipantId,
        product_id: &ProductId,
        new_custodian: &ParticipantId,
        location: impl Into<String>,
        notes: impl Into<String>,
    ) -> Result<SequenceNumber> {
        let guard = self.lock().await;

        let mut product = self
            .store
            .get_product(product_id)
            .await?
            .ok_or_else(|| product_not_found(product_id))?;

        let caller_record = self.store.get_participant(caller).await?;
        let recipient_record = self.store.get_participant(new_custodian).await?;
        policy::authorize_transfer(
            &product,
            caller,
            caller_record.as_ref(),
            recipient_record.as_ref(),
        )?;

        let previous = product.clone();
        product.custodian = new_custodian.clone();

        let pending = PendingEntry {
            product_id: product_id.clone(),
            kind: EntryKind::Custody,
            from: caller.clone(),
            to: new_custodian.clone(),
            timestamp: self.clock.now(),
            location: location.into(),
            notes: notes.into(),
        };

        info!(
            product_id = %product_id,
            from = %caller,
            to = %new_custodian,
            "Transferring custody"
        );
        self.append(
            &guard,
            Changeset::new().with_product_update(previous, product),
            pending,
        )
        .await
    }

    /// End a product's tracked lifecycle
    ///
    /// Only the current custodian may deactivate. Under the default policy
    /// the custodian need not be verified. Deactivating an inactive product
    /// is a no-op.
    pub async fn deactivate_product(
        &self,
        caller: &ParticipantId,
        product_id: &ProductId,
    ) -> Result<()> {
        let _guard = self.lock().await;

        let mut product = self
            .store
            .get_product(product_id)
            .await?
            .ok_or_else(|| product_not_found(product_id))?;

        let caller_record = self.store.get_participant(caller).await?;
        policy::authorize_deactivate(
            &product,
            caller,
            caller_record.as_ref(),
            self.config.deactivation_policy,
        )?;

        if !product.active {
            info!(product_id = %product_id, "Product already inactive");
            return Ok(());
        }

        let previous = product.clone();
        product.active = false;
        self.store
            .apply(Changeset::new().with_product_update(previous, product))
            .await?;

        info!(product_id = %product_id, custodian = %caller, "Deactivated product");
        Ok(())
    }

    /// Attach a certification or inspection note to a product
    ///
    /// The caller must be verified. Custody is unchanged and the product's
    /// active flag is not consulted.
    pub async fn certify_product(
        &self,
        caller: &ParticipantId,
        product_id: &ProductId,
        details: impl Into<String>,
        location: impl Into<String>,
    ) -> Result<SequenceNumber> {
        let guard = self.lock().await;

        let caller_record = self.store.get_participant(caller).await?;
        policy::authorize_certify(caller, caller_record.as_ref())?;

        let product = self
            .store
            .get_product(product_id)
            .await?
            .ok_or_else(|| product_not_found(product_id))?;

        let pending = PendingEntry {
            product_id: product_id.clone(),
            kind: EntryKind::Certification,
            from: caller.clone(),
            to: product.custodian,
            timestamp: self.clock.now(),
            location: location.into(),
            notes: details.into(),
        };

        info!(product_id = %product_id, certifier = %caller, "Certifying product");
        self.append(&guard, Changeset::new(), pending).await
    }

    /// Look up a product
    pub async fn product(&self, product_id: &ProductId) -> Result<Option<Product>> {
        Ok(self.store.get_product(product_id).await?)
    }
}
