use std::io::{self, Write as _};
use std::path::Path;
use std::process::ExitCode;

use log::{debug, info};

use waypath::{
    DEFAULT_BUFFER_DEGREES, Error, Geocoder, GeocoderConfig, MAP_FILE_NAME, NetworkClient,
    NetworkConfig, TravelMode, Weight, bounding_region, format_summary, render_map, shortest_path,
    summarize, write_map,
};

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, Error> {
    let origin_address = prompt("Enter the origin address: ")?;
    let destination_address = prompt("Enter the destination address: ")?;

    // Attempt both addresses before aborting so the user sees both outcomes
    let geocoder = Geocoder::new(GeocoderConfig::default());
    let origin = geocoder.geocode(&origin_address);
    let destination = geocoder.geocode(&destination_address);
    for result in [&origin, &destination] {
        if let Err(e) = result {
            eprintln!("{e}");
        }
    }
    let (Ok(origin), Ok(destination)) = (origin, destination) else {
        eprintln!("Unable to geocode one or both addresses, exiting");
        return Ok(ExitCode::FAILURE);
    };

    let region = bounding_region(origin, destination, DEFAULT_BUFFER_DEGREES);
    let client = NetworkClient::new(NetworkConfig::default());
    let network = client.fetch(&region, TravelMode::Drive, true)?;

    let (origin_node, origin_offset) = network.nearest_node(&origin)?;
    let (destination_node, destination_offset) = network.nearest_node(&destination)?;
    debug!("snapped endpoints {origin_offset:.1} m and {destination_offset:.1} m from the addresses");

    // The two weight variants are independent; one failing does not
    // block the other.
    let by_length = match shortest_path(&network, origin_node, destination_node, Weight::Length) {
        Ok(route) => Some(route),
        Err(e) => {
            eprintln!("{e} (by length)");
            None
        }
    };
    let by_time = match shortest_path(&network, origin_node, destination_node, Weight::TravelTime) {
        Ok(route) => Some(route),
        Err(e) => {
            eprintln!("{e} (by travel time)");
            None
        }
    };
    if by_length.is_none() && by_time.is_none() {
        eprintln!("No path found between the origin and destination, exiting");
        return Ok(ExitCode::FAILURE);
    }

    let length_meters = by_length
        .as_ref()
        .map(|route| summarize(&network, Some(route), Weight::Length))
        .transpose()?;
    let time_seconds = by_time
        .as_ref()
        .map(|route| summarize(&network, Some(route), Weight::TravelTime))
        .transpose()?;

    let summary = format_summary(length_meters, time_seconds);
    println!("{summary}");

    let html = render_map(
        &network,
        origin,
        destination,
        by_length.as_ref(),
        by_time.as_ref(),
        &summary,
    );
    write_map(Path::new(MAP_FILE_NAME), &html)?;
    info!("map written to {MAP_FILE_NAME}");
    println!("Map saved to {MAP_FILE_NAME}");

    Ok(ExitCode::SUCCESS)
}

fn prompt(message: &str) -> Result<String, Error> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
