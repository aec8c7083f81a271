// Colored terminal output for topic model containers.
//
// This module handles all terminal-specific formatting. The main.rs
// command handlers delegate here.

use colored::Colorize;

use super::truncate_term;
use crate::model::TopicModelContainer;

/// Display the heaviest words of every topic as weight bars.
pub fn display_topics(model: &TopicModelContainer, top_n: usize) {
    println!(
        "\n{}",
        format!(
            "=== Topics ({} topics, top {} words each) ===",
            model.topic_count(),
            top_n
        )
        .bold()
    );

    let bar_width: usize = 20;

    for topic_id in 0..model.topic_count() {
        println!();
        println!("  {}", format!("Topic {topic_id}").bold());

        let words = model.top_words(topic_id, top_n).unwrap_or_default();
        // Bars are scaled to the topic's heaviest word
        let heaviest = words.first().map(|(_, w)| *w).unwrap_or(0.0);

        for (term, weight) in words {
            let filled = if heaviest > 0.0 {
                ((weight / heaviest) * bar_width as f64).round() as usize
            } else {
                0
            };
            let bar = format!(
                "[{}{}]",
                "=".repeat(filled.min(bar_width)),
                " ".repeat(bar_width.saturating_sub(filled))
            );

            let share = if heaviest > 0.0 { weight / heaviest } else { 0.0 };
            let colored_bar = if share >= 0.75 {
                bar.bright_green()
            } else if share >= 0.40 {
                bar.bright_yellow()
            } else {
                bar.bright_blue()
            };

            println!(
                "    {:<28} {} {:.4}",
                truncate_term(term, 25),
                colored_bar,
                weight
            );
        }
    }
    println!();
}

/// Display shape, language, and per-topic statistics.
pub fn display_summary(model: &TopicModelContainer) {
    println!("\n{}", "=== Topic Model Summary ===".bold());
    println!();

    let language = model
        .vocabulary()
        .language()
        .map(|l| l.to_string())
        .unwrap_or_else(|| "none".to_string());

    println!("  {:<16} {}", "Topics".dimmed(), model.topic_count());
    println!("  {:<16} {}", "Vocabulary".dimmed(), model.vocabulary_size());
    println!("  {:<16} {}", "Language".dimmed(), language);
    println!("  {:<16} {}", "Documents".dimmed(), model.document_count());
    println!("  {:<16} {}", "Tokens".dimmed(), model.total_tokens());
    println!();

    println!(
        "  {:>5}  {:>10}  {:>10}  {:>10}  {:>10}",
        "Topic".dimmed(),
        "Min".dimmed(),
        "Max".dimmed(),
        "Sum".dimmed(),
        "Mean".dimmed(),
    );
    println!("  {}", "-".repeat(55).dimmed());

    for topic_id in 0..model.topic_count() {
        if let Some(stats) = model.topic_stats(topic_id) {
            let sum = format!("{:>10.4}", stats.sum);
            // A topic that is not a distribution is worth a second look
            let sum = if (stats.sum - 1.0).abs() > 1e-6 {
                sum.yellow()
            } else {
                sum.normal()
            };
            println!(
                "  {:>5}  {:>10.4}  {:>10.4}  {}  {:>10.6}",
                stats.topic_id, stats.min, stats.max, sum, stats.average
            );
        }
    }
    println!();
}
