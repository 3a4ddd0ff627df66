/// arrears sweep - aggregate overdue installments per client and dispatch
use installment_sales_rs::{
    ArrearsNotifier, Client, ClientOverdueInfo, InMemorySaleStore, InstallmentEngine, Money,
    NotifyError, Sale, SafeTimeProvider, TimeSource, Uuid,
};
use chrono::{NaiveDate, TimeZone, Utc};
use std::sync::Arc;

/// console notifier standing in for the email collaborator
struct ConsoleNotifier;

impl ArrearsNotifier for ConsoleNotifier {
    fn notify(&self, info: &ClientOverdueInfo) -> Result<(), NotifyError> {
        println!(
            "  -> notifying {}: {} overdue quotas, {} total",
            info.client.full_name, info.overdue_quota_count, info.total_overdue
        );
        for i in &info.installments {
            println!(
                "       {} / {} quota {} due {} ({} days): {}",
                i.project_label, i.lot_label, i.quota_number, i.due_date, i.days_overdue, i.balance
            );
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== arrears sweep ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 4, 20, 9, 0, 0).unwrap(),
    ));
    let store = Arc::new(InMemorySaleStore::new());

    let late = Client {
        client_id: Uuid::new_v4(),
        full_name: "Marta Ríos".to_string(),
        email: Some("marta@example.com".to_string()),
    };
    let punctual = Client {
        client_id: Uuid::new_v4(),
        full_name: "Ana Vidal".to_string(),
        email: Some("ana@example.com".to_string()),
    };
    store.insert_client(late.clone())?;
    store.insert_client(punctual.clone())?;

    // two lots behind schedule for marta
    for (lot, sold) in [("Lote 3", "2024-01-31"), ("Lote 8", "2024-01-15")] {
        store.insert_sale(Sale::automatic(
            late.client_id,
            lot,
            "Altos del Norte",
            Money::from_major(3_000_000),
            Money::ZERO,
            sold.parse::<NaiveDate>()?,
            3,
            None,
        ))?;
    }

    // ana's sale has nothing due yet
    store.insert_sale(Sale::automatic(
        punctual.client_id,
        "Lote 21",
        "Villa Sol",
        Money::from_major(12_000_000),
        Money::from_major(2_000_000),
        NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        10,
        None,
    ))?;

    let mut engine = InstallmentEngine::new(store);

    println!("sweep as of {}:", time.now().format("%Y-%m-%d"));
    let sweep = engine.notify_arrears(&ConsoleNotifier, &time)?;

    println!(
        "\nclients in arrears: {} (notified {}, failed {})",
        sweep.clients.len(),
        sweep.notified,
        sweep.failed
    );
    println!("events recorded: {}", engine.events.events().len());

    Ok(())
}
