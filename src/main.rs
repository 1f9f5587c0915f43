use clap::Parser;
use newton_trace::config::LogFormat;
use newton_trace::core::ConfigProvider;
use newton_trace::report::TraceSummary;
use newton_trace::utils::error::{ErrorSeverity, NewtonError};
use newton_trace::utils::{logger, validation::Validate};
use newton_trace::{
    CliConfig, LocalStorage, NewtonEngine, RunSettings, SymbolicCompiler, TomlConfig,
    TraceExporter,
};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入 TOML 配置（如果有指定）
    let file = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path.display(), e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let settings = RunSettings::from_sources(&cli, file.as_ref());

    // 初始化日誌
    match settings.log_format {
        LogFormat::Compact => logger::init_cli_logger(settings.verbose),
        LogFormat::Json => logger::init_json_logger(settings.verbose),
    }

    tracing::info!("Starting newton-trace");
    tracing::debug!("Resolved settings: {:?}", settings);

    // 驗證合併後的配置（命令列已覆蓋設定檔）
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(&settings) {
        tracing::error!(
            "❌ Newton run failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

/// Computes, prints and optionally exports one trace. A stalled run is not an error.
fn run(settings: &RunSettings) -> Result<(), NewtonError> {
    let engine = NewtonEngine::new(SymbolicCompiler);
    let trace = engine.compute(
        settings.function(),
        settings.initial_guess(),
        settings.iterations(),
    )?;

    print!("{}", TraceSummary(&trace));

    if let Some(output_path) = settings.output_path() {
        let exporter = TraceExporter::new(LocalStorage::new(output_path));
        let written = exporter.export(&trace, &settings.formats)?;
        tracing::info!("📁 Output saved to: {} ({})", output_path, written.join(", "));
        println!("📁 Output saved to: {}", output_path);
    }

    Ok(())
}
