use weighted_histogram::WeightedHistogram;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Create a histogram with 32 bins and slow decay
    let mut histogram = WeightedHistogram::new(32, 0.99)?;

    // Simulate latencies around 20ms
    for i in 1..=1000 {
        histogram.add(20.0 + (i % 7) as f64)?;
    }

    println!("Total weight: {:.2}", histogram.total_weight());
    println!("Median (50th percentile): {:.2}", histogram.quantile(0.5)?);
    println!("99th percentile: {:.2}", histogram.quantile(0.99)?);

    // Latencies jump to around 80ms; the old regime decays away
    for i in 1..=1000 {
        histogram.add(80.0 + (i % 11) as f64)?;
    }

    println!("\nAfter the shift:");
    println!("Median: {:.2}", histogram.quantile(0.5)?);
    println!("Mean: {:.2}", histogram.mean().unwrap_or_default());
    println!("Fraction below 50ms: {:.4}", histogram.cdf(50.0)?);
    println!("\n{}", histogram);

    Ok(())
}
