mod config_loading;
mod determinism;
mod force_override;
mod reference_scenario;
