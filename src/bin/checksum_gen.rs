use plastic_lif::{
    analysis,
    params::SimulationParams,
    record::SimulationRecord,
    simulation::{self, Simulation},
};

#[path = "../scenario_params.rs"]
mod scenario_params;

fn print_record_checksums(record: &SimulationRecord) {
    let spike_time_checksum: f64 = record.spike_times.iter().sum();
    let voltage_checksum: f64 = record.voltages.iter().sum();
    let threshold_checksum: f64 = record.thresholds.iter().sum();

    let weight_checksum: f64 = record
        .weights
        .last()
        .map(|weights| {
            weights
                .iter()
                .enumerate()
                .map(|(idx, weight)| (idx + 1) as f64 * weight)
                .sum()
        })
        .unwrap_or(0.0);

    println!("...spike count: {}", record.spike_count());
    println!("...mean firing rate: {}", record.mean_firing_rate());
    println!("...spike times checksum: {}", spike_time_checksum);
    println!("...voltages checksum: {}", voltage_checksum);
    println!("...thresholds checksum: {}", threshold_checksum);
    println!("...final weights checksum: {}", weight_checksum);
}

fn print_input_correlation(simulation: &Simulation) {
    let trains = simulation.get_excitatory_spike_trains();
    let num_group_1 = trains.len() / 2;

    for (name, group) in [
        ("group 1", &trains[..num_group_1]),
        ("group 2", &trains[num_group_1..]),
    ] {
        match analysis::mean_pairwise_correlation(group, 1) {
            Ok(c) => println!("...{} input correlation: {:.4}", name, c),
            Err(err) => println!("...{} input correlation: {}", name, err),
        }
    }
}

fn run(params: SimulationParams) -> SimulationRecord {
    let simulation = simulation::create_simulation(params).unwrap();
    print_input_correlation(&simulation);
    simulation.run().unwrap()
}

fn main() {
    println!("stdp/ip result:");
    let record = run(scenario_params::get_stdp_ip_scenario_params());
    print_record_checksums(&record);
    println!("...rate checkpoints: {:?}", record.checkpoint_rates());

    println!("stp result:");
    let params = scenario_params::get_stp_scenario_params();
    let input_rate = params.excitatory_params.firing_rate;
    let record = run(params);
    print_record_checksums(&record);

    let facilitation_checksum: f64 = record
        .facilitation
        .iter()
        .flatten()
        .flatten()
        .sum();

    let depression_checksum: f64 = record.depression.iter().flatten().flatten().sum();

    println!("...facilitation checksum: {}", facilitation_checksum);
    println!("...depression checksum: {}", depression_checksum);
    println!(
        "...transmission ratio: {}",
        record.transmission_ratio(input_rate)
    );
}
