use std::sync::Arc;

use anyhow::{bail, Context};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ontorank::{Document, InMemoryOntology, RankerConfig, TextNormalizer};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::from_default_env().add_directive("ontorank=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        bail!("usage: ontorank <ontology.json> <document.txt> [more documents...]");
    }

    let config = RankerConfig::from_env();
    let normalizer = TextNormalizer::new(&config.language)?;

    let ontology_json = std::fs::read_to_string(&args[0])
        .with_context(|| format!("reading ontology file {}", args[0]))?;
    let ontology = Arc::new(InMemoryOntology::from_json(&ontology_json, &normalizer)?);

    let mut ranked: Vec<(Document, f64)> = Vec::new();
    for path in &args[1..] {
        let mut document =
            Document::from_file(path).with_context(|| format!("reading document {path}"))?;
        document.attach(ontology.clone())?;
        let rank = document.rank(
            config.max_path_length,
            config.k,
            config.co_occurrence_threshold,
        )?;
        ranked.push((document, rank));
    }
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    println!("{:<40} {:>8}", "document", "rank");
    for (document, rank) in &ranked {
        println!("{:<40} {:>8.3}", document.filename(), rank);
    }

    for (document, _) in &ranked {
        if document.attached_nodes().is_empty() {
            continue;
        }
        println!("\n{}:", document.filename());
        let mut concepts: Vec<(u64, String)> = document
            .attached_nodes()
            .iter()
            .map(|node| {
                let count = document.node_counts()[&node.id];
                (count, node.display_name.clone())
            })
            .collect();
        concepts.sort_by(|a, b| b.cmp(a));
        for (index, (count, name)) in concepts.iter().enumerate() {
            println!("  {}. {name} ({count})", index + 1);
        }
    }

    Ok(())
}
