use bandpulse_audio::{config::AnalyzerConfig, fetcher::DummyFetcher, AudioAnalyser};

fn main() {
    let mut analyser = AudioAnalyser::new(DummyFetcher::new(), AnalyzerConfig::default()).unwrap();

    let analysis = analyser.on_tick().unwrap();
    println!("bands: {:?}, amplitude: {}", &*analysis.bands, analysis.amplitude);
}
