use storage_bench::{
    default_catalog, Dimension, Durability, Operation, Procedure, ScenarioCatalog, ScenarioConfig,
    Variant,
};

/// The built-in catalog with the stock row counts.
pub fn stock_catalog() -> ScenarioCatalog {
    default_catalog(&ScenarioConfig::default()).expect("stock catalog")
}

pub fn stock_dimension(name: &str) -> Dimension {
    stock_catalog()
        .dimension(name)
        .expect("stock dimension")
        .clone()
}

pub fn scratch_variant(name: &str, table: &str, durability: Durability) -> Variant {
    Variant::new(name, table, Procedure::scratch_table(table, durability))
        .with_teardown(Procedure::drop_table(table))
}

/// Logged vs. unlogged scratch tables sharing `operations`.
pub fn durability_dimension(operations: Vec<Operation>) -> Dimension {
    let mut builder = ScenarioCatalog::builder();
    builder
        .register(
            "durability",
            scratch_variant("durable", "test_logged", Durability::Logged),
            operations.clone(),
        )
        .expect("register durable")
        .register(
            "durability",
            scratch_variant("non-durable", "test_unlogged", Durability::Unlogged),
            operations,
        )
        .expect("register non-durable");
    builder
        .build()
        .dimension("durability")
        .expect("durability dimension")
        .clone()
}
