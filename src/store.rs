use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::sale::{CustomQuota, FinancingPlan, Sale};
use crate::schedule::PaymentAllocation;
use crate::types::{Client, ClientId, SaleId, SaleStatus};

/// everything the read side needs for one sale, fetched in one round trip
#[derive(Debug, Clone)]
pub struct SaleSnapshot {
    pub client: Client,
    pub sale: Sale,
    pub allocations: Vec<PaymentAllocation>,
}

/// persistence boundary so the engine can be exercised in isolation.
/// `commit_redistribution` has compare-and-swap semantics: the write applies
/// only when the stored version still matches `expected_version`, and it
/// updates the absorbed list and the custom-quota list as one unit.
pub trait SaleStore: Send + Sync {
    fn fetch_sale(&self, sale_id: SaleId) -> Result<Option<SaleSnapshot>, StoreError>;

    /// every active sale with its allocations, in bulk; sweeps must not fetch
    /// once per sale
    fn fetch_active_sales(&self) -> Result<Vec<SaleSnapshot>, StoreError>;

    fn commit_redistribution(
        &self,
        sale_id: SaleId,
        expected_version: u64,
        absorbed: &[u32],
        quotas: &[CustomQuota],
    ) -> Result<(), StoreError>;
}

impl<S: SaleStore + ?Sized> SaleStore for Arc<S> {
    fn fetch_sale(&self, sale_id: SaleId) -> Result<Option<SaleSnapshot>, StoreError> {
        (**self).fetch_sale(sale_id)
    }

    fn fetch_active_sales(&self) -> Result<Vec<SaleSnapshot>, StoreError> {
        (**self).fetch_active_sales()
    }

    fn commit_redistribution(
        &self,
        sale_id: SaleId,
        expected_version: u64,
        absorbed: &[u32],
        quotas: &[CustomQuota],
    ) -> Result<(), StoreError> {
        (**self).commit_redistribution(sale_id, expected_version, absorbed, quotas)
    }
}

/// store failure taxonomy
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sale not found")]
    NotFound,
    #[error("version conflict: expected {expected}, found {found}")]
    Conflict { expected: u64, found: u64 },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// in-memory store for tests and demos
#[derive(Default)]
pub struct InMemorySaleStore {
    inner: RwLock<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    clients: HashMap<ClientId, Client>,
    sales: HashMap<SaleId, Sale>,
    allocations: HashMap<SaleId, Vec<PaymentAllocation>>,
}

impl InMemorySaleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_client(&self, client: Client) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        inner.clients.insert(client.client_id, client);
        Ok(())
    }

    pub fn insert_sale(&self, sale: Sale) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        inner.sales.insert(sale.sale_id, sale);
        Ok(())
    }

    /// record an allocation and maintain the owning sale's raised/debt totals
    pub fn record_allocation(&self, allocation: PaymentAllocation) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let sale = inner
            .sales
            .get_mut(&allocation.sale_id)
            .ok_or(StoreError::NotFound)?;
        sale.record_raised(allocation.amount);
        sale.version += 1;
        inner
            .allocations
            .entry(allocation.sale_id)
            .or_default()
            .push(allocation);
        Ok(())
    }

    pub fn update_sale_status(&self, sale_id: SaleId, status: SaleStatus) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let sale = inner.sales.get_mut(&sale_id).ok_or(StoreError::NotFound)?;
        sale.update_status(status);
        sale.version += 1;
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, StoreInner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, StoreInner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

impl StoreInner {
    fn snapshot(&self, sale: &Sale) -> SaleSnapshot {
        let client = self
            .clients
            .get(&sale.client_id)
            .cloned()
            .unwrap_or_else(|| Client {
                client_id: sale.client_id,
                full_name: String::new(),
                email: None,
            });
        SaleSnapshot {
            client,
            sale: sale.clone(),
            allocations: self
                .allocations
                .get(&sale.sale_id)
                .cloned()
                .unwrap_or_default(),
        }
    }
}

impl SaleStore for InMemorySaleStore {
    fn fetch_sale(&self, sale_id: SaleId) -> Result<Option<SaleSnapshot>, StoreError> {
        let inner = self.read()?;
        Ok(inner.sales.get(&sale_id).map(|sale| inner.snapshot(sale)))
    }

    fn fetch_active_sales(&self) -> Result<Vec<SaleSnapshot>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .sales
            .values()
            .filter(|sale| sale.is_active())
            .map(|sale| inner.snapshot(sale))
            .collect())
    }

    fn commit_redistribution(
        &self,
        sale_id: SaleId,
        expected_version: u64,
        absorbed: &[u32],
        quotas: &[CustomQuota],
    ) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let sale = inner.sales.get_mut(&sale_id).ok_or(StoreError::NotFound)?;
        if sale.version != expected_version {
            return Err(StoreError::Conflict {
                expected: expected_version,
                found: sale.version,
            });
        }
        sale.absorbed_quotas = absorbed.to_vec();
        sale.plan = FinancingPlan::custom(quotas.to_vec());
        // the explicit list supersedes any scalar override
        sale.new_quota_value = None;
        sale.version += 1;
        Ok(())
    }
}
