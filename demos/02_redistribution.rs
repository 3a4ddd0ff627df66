/// redistribution - fold an overdue balance into the remaining quotas
use installment_sales_rs::{
    Client, InMemorySaleStore, InstallmentEngine, Money, RedistributionPolicy, Sale,
    SafeTimeProvider, TimeSource, Uuid,
};
use chrono::{NaiveDate, TimeZone, Utc};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== redistribution ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 4, 20, 9, 0, 0).unwrap(),
    ));
    let store = Arc::new(InMemorySaleStore::new());

    let client = Client {
        client_id: Uuid::new_v4(),
        full_name: "Jorge Medina".to_string(),
        email: None,
    };
    store.insert_client(client.clone())?;

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

    let mut engine = InstallmentEngine::new(store);

    println!("before, as of {}:", time.now().format("%Y-%m-%d"));
    for i in engine.schedule_for_sale(sale_id, &time)? {
        println!(
            "  quota {} due {} expected {} -> {:?}",
            i.number, i.due_date, i.expected, i.status
        );
    }

    // quotas 1 and 2 are in arrears; fold their balance into what remains
    let outcome = engine.redistribute(sale_id, RedistributionPolicy::Uniform, &time)?;
    println!(
        "\nredistributed {} from quotas {:?}",
        outcome.redistributed_balance, outcome.absorbed_numbers
    );

    println!("\nafter:");
    for i in engine.schedule_for_sale(sale_id, &time)? {
        println!(
            "  quota {} due {} expected {} -> {:?}",
            i.number, i.due_date, i.expected, i.status
        );
    }

    // a second attempt has nothing left to redistribute
    match engine.redistribute(sale_id, RedistributionPolicy::Uniform, &time) {
        Err(err) => println!("\nsecond attempt rejected: {}", err),
        Ok(_) => println!("\nunexpected: second redistribution succeeded"),
    }

    Ok(())
}
