use chrono::{DateTime, Duration};
use graph::{Commit, LoadOutcome, MemorySource, Paginator, TextRenderer};

/// A small history with two merged feature branches and a hotfix
fn demo_history() -> Vec<Commit> {
    let entries: &[(&str, &[&str], &str, &[&str])] = &[
        ("a9f1c02", &["7e3b9d4", "c41d8e0"], "Merge branch 'feature/rails'", &["HEAD", "main"]),
        ("c41d8e0", &["5b2a7f1"], "Reuse freed rails for new branches", &["feature/rails"]),
        ("7e3b9d4", &["e0c6a13", "91fd2b7"], "Merge branch 'hotfix/dangling'", &[]),
        ("91fd2b7", &["3f8e5c9"], "Skip parents that were never fetched", &["tag: v0.2.1"]),
        ("5b2a7f1", &["3f8e5c9"], "Track rails waiting on each parent", &[]),
        ("e0c6a13", &["3f8e5c9"], "Document the renderer contract", &[]),
        ("3f8e5c9", &["0d4b1aa"], "Paginate history loading", &["tag: v0.2.0"]),
        ("0d4b1aa", &[], "Initial commit", &[]),
    ];

    // 2024-05-01 12:00 UTC
    let start = DateTime::from_timestamp(1_714_564_800, 0).unwrap_or_default();
    entries
        .iter()
        .enumerate()
        .map(|(i, (hash, parents, message, refs))| {
            Commit::new(
                hash.to_string(),
                parents.iter().map(|p| p.to_string()).collect(),
                start - Duration::hours(i as i64),
                "Demo".to_string(),
                message.to_string(),
            )
            .with_refs(refs.iter().map(|r| r.to_string()).collect())
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("Rail Graph Demo");
    println!("===============\n");

    let paginator = Paginator::new(MemorySource::new("demo", demo_history()), 4);
    let renderer = TextRenderer::default();

    paginator.refresh().await?;
    println!("First page:");
    println!("{}\n", renderer.render(&paginator.layout()));

    while let LoadOutcome::Loaded { added } = paginator.load_more().await? {
        println!("Loaded {} more commits", added);
    }

    let layout = paginator.layout();
    let stats = layout.stats();
    println!(
        "Full history ({} commits, {} rails, {} merges):",
        stats.total_commits, stats.rail_count, stats.merge_commits
    );
    println!("{}", renderer.render(&layout));

    Ok(())
}
