/// serialization support for the sale's list-valued text fields and api views
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::decimal::Money;
use crate::errors::{Result, ScheduleError};
use crate::sale::{CustomQuota, Sale};
use crate::schedule::CalculatedInstallment;
use crate::types::{InstallmentStatus, SaleId, SaleStatus};

/// strict parse of a serialized custom-quota list
pub fn decode_custom_quotas(sale_id: SaleId, raw: &str) -> Result<Vec<CustomQuota>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).map_err(|err| ScheduleError::MalformedScheduleData {
        sale_id,
        field: "custom_quotas",
        message: err.to_string(),
    })
}

/// strict parse of a serialized absorbed-quota-number list
pub fn decode_absorbed_quotas(sale_id: SaleId, raw: &str) -> Result<Vec<u32>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let mut numbers: Vec<u32> =
        serde_json::from_str(trimmed).map_err(|err| ScheduleError::MalformedScheduleData {
            sale_id,
            field: "absorbed_quotas",
            message: err.to_string(),
        })?;
    numbers.sort_unstable();
    numbers.dedup();
    Ok(numbers)
}

/// defensive parse: a malformed or absent value is an empty list, logged for
/// operator visibility, never a hard failure
pub fn parse_custom_quotas(sale_id: SaleId, raw: Option<&str>) -> Vec<CustomQuota> {
    match raw {
        None => Vec::new(),
        Some(raw) => decode_custom_quotas(sale_id, raw).unwrap_or_else(|err| {
            warn!(%sale_id, %err, "treating custom quota list as empty");
            Vec::new()
        }),
    }
}

/// defensive parse of the absorbed-number list, same recovery rule
pub fn parse_absorbed_quotas(sale_id: SaleId, raw: Option<&str>) -> Vec<u32> {
    match raw {
        None => Vec::new(),
        Some(raw) => decode_absorbed_quotas(sale_id, raw).unwrap_or_else(|err| {
            warn!(%sale_id, %err, "treating absorbed quota list as empty");
            Vec::new()
        }),
    }
}

pub fn encode_custom_quotas(quotas: &[CustomQuota]) -> serde_json::Result<String> {
    serde_json::to_string(quotas)
}

pub fn encode_absorbed_quotas(numbers: &[u32]) -> serde_json::Result<String> {
    serde_json::to_string(numbers)
}

/// serializable view of a computed schedule, shaped for the api layer
#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleView {
    pub sale_id: SaleId,
    pub sale_status: SaleStatus,
    pub total_value: Money,
    pub total_raised: Money,
    pub total_debt: Money,
    pub installments: Vec<InstallmentView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InstallmentView {
    pub number: u32,
    pub expected: Money,
    pub paid: Money,
    pub balance: Money,
    pub due_date: chrono::NaiveDate,
    pub status: InstallmentStatus,
    pub days_overdue: u32,
}

impl ScheduleView {
    pub fn from_schedule(sale: &Sale, schedule: &[CalculatedInstallment]) -> Self {
        ScheduleView {
            sale_id: sale.sale_id,
            sale_status: sale.status,
            total_value: sale.total_value,
            total_raised: sale.total_raised,
            total_debt: sale.total_debt,
            installments: schedule
                .iter()
                .map(|i| InstallmentView {
                    number: i.number,
                    expected: i.expected,
                    paid: i.paid,
                    balance: i.balance,
                    due_date: i.due_date,
                    status: i.status,
                    days_overdue: i.days_overdue,
                })
                .collect(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn test_round_trip_custom_quotas() {
        let sale_id = Uuid::new_v4();
        let quotas = vec![
            CustomQuota {
                number: 1,
                amount: Money::from_major(750_000),
                due_date: NaiveDate::from_ymd_opt(2024, 5, 15),
            },
            CustomQuota {
                number: 2,
                amount: Money::from_major(1_250_000),
                due_date: None,
            },
        ];

        let encoded = encode_custom_quotas(&quotas).unwrap();
        let decoded = decode_custom_quotas(sale_id, &encoded).unwrap();
        assert_eq!(decoded, quotas);
    }

    #[test]
    fn test_malformed_input_recovers_to_empty() {
        let sale_id = Uuid::new_v4();

        assert!(parse_custom_quotas(sale_id, Some("{not json")).is_empty());
        assert!(parse_custom_quotas(sale_id, None).is_empty());
        assert!(parse_absorbed_quotas(sale_id, Some("\"1,2,3\"")).is_empty());
        assert!(parse_absorbed_quotas(sale_id, Some("   ")).is_empty());
    }

    #[test]
    fn test_strict_parse_surfaces_the_error() {
        let sale_id = Uuid::new_v4();
        assert!(matches!(
            decode_absorbed_quotas(sale_id, "oops"),
            Err(ScheduleError::MalformedScheduleData {
                field: "absorbed_quotas",
                ..
            })
        ));
    }

    #[test]
    fn test_absorbed_list_sorted_and_deduplicated() {
        let sale_id = Uuid::new_v4();
        let numbers = decode_absorbed_quotas(sale_id, "[3, 1, 2, 3, 1]").unwrap();
        assert_eq!(numbers, vec![1, 2, 3]);
    }
}
