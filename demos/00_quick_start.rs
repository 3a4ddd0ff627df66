/// quick start - compute an installment schedule for a financed lot
use installment_sales_rs::{
    Client, InMemorySaleStore, InstallmentEngine, Money, PaymentAllocation, Sale,
    SafeTimeProvider, TimeSource, Uuid,
};
use chrono::{NaiveDate, TimeZone, Utc};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== quick start ===\n");

    // pinned clock so the walkthrough is reproducible
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 4, 20, 9, 0, 0).unwrap(),
    ));

    let store = Arc::new(InMemorySaleStore::new());
    let client = Client {
        client_id: Uuid::new_v4(),
        full_name: "Jorge Medina".to_string(),
        email: Some("jorge@example.com".to_string()),
    };
    store.insert_client(client.clone())?;

    // lot sold january 31st: 3 monthly quotas of 1,000,000 over the financed
    // balance, due at month ends thanks to day clamping
    let sale = Sale::automatic(
        client.client_id,
        "Lote 12",
        "Altos del Norte",
        Money::from_major(3_000_000),
        Money::ZERO,
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        3,
        None,
    );
    let sale_id = sale.sale_id;
    store.insert_sale(sale)?;

    // a partial payment against quota 1
    store.record_allocation(PaymentAllocation {
        payment_id: Uuid::new_v4(),
        sale_id,
        quota_number: 1,
        amount: Money::from_major(400_000),
        paid_on: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
    })?;

    let engine = InstallmentEngine::new(store);

    println!("schedule as of {}:", time.now().format("%Y-%m-%d"));
    for installment in engine.schedule_for_sale(sale_id, &time)? {
        println!(
            "  quota {} due {} expected {} paid {} balance {} -> {:?} ({} days overdue)",
            installment.number,
            installment.due_date,
            installment.expected,
            installment.paid,
            installment.balance,
            installment.status,
            installment.days_overdue,
        );
    }

    let overdue = engine.overdue_for_sale(sale_id, &time)?;
    println!("\noverdue quotas: {}", overdue.len());

    println!("\nas json:\n{}", engine.schedule_view(sale_id, &time)?.to_json_pretty()?);

    Ok(())
}
