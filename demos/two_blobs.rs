use kcluster::*;

fn main() -> kcluster::Result<()> {
    // Two well-separated blobs around (0.5, 1.0) and (10.0, 9.5)
    let records = "1.0,1.0\n0.0,1.0\n9.0,9.0\n11.0,10.0\n";
    let (samples, skipped) = read_samples::<f64, _>(records.as_bytes(), ParsePolicy::FailFast)?;
    println!("Loaded {} samples ({} skipped)", samples.sample_cnt(), skipped);

    let seed = seeds::from_delimited("0.0,0.0\t10.0,10.0", '\t', ',')?;

    let conf = ClusterConfig::build()
        .max_rounds(10)
        .round_done(&|_, round, unchanged| println!("Round {} - {} centroids unchanged", round, unchanged))
        .build();

    let driver = ClusterDriver::new(samples, EuclideanDistance);
    let mut sink = DelimitedWriterSink::new(std::io::stdout());
    let outcome = driver.run_with_sink(seed, &conf, &mut sink)?;

    println!("Centroids: {:?}", outcome.centroids);
    println!("Termination: {:?} after {} rounds", outcome.reason, outcome.rounds);
    Ok(())
}
