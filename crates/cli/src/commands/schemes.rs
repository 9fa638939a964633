//! `sahayak schemes`: inspect the scheme catalog.

use sahayak_config::AppConfig;

pub async fn run(id: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let catalog = super::load_catalog(&config)?;

    if let Some(id) = id {
        let scheme = catalog
            .get(&id)
            .ok_or_else(|| format!("No scheme with id '{id}'"))?;
        println!("{}", serde_json::to_string_pretty(scheme)?);
        return Ok(());
    }

    println!();
    println!("  {} schemes", catalog.len());
    println!();
    for scheme in catalog.schemes() {
        println!("  {:<26} {}", scheme.id, scheme.name);
        if !scheme.description.is_empty() {
            println!("  {:<26} {}", "", scheme.description);
        }
    }
    println!();
    Ok(())
}
