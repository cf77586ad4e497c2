use anyhow::{Context, Result};
use clap::Parser;
use dem2las::{ConversionConfig, GdalRaster, LasWriter, Pipeline, RasterSource, Vector3};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 入力DEMラスタ（GDALで読めるファイル）
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// 出力ファイルのベース名（{base}.{n}.las）
    #[arg(value_name = "OUTPUT_BASE")]
    output: PathBuf,

    /// 読み込むバンド番号（1始まり）
    #[arg(long, default_value_t = dem2las::config::DEFAULT_BAND)]
    band: usize,

    /// NoData値
    #[arg(
        long,
        allow_negative_numbers = true,
        default_value_t = dem2las::config::DEFAULT_NO_DATA_VALUE
    )]
    nodata: f32,

    /// 1ファイルあたりの点数の上限
    #[arg(long, default_value_t = dem2las::config::DEFAULT_POINT_LIMIT)]
    limit: usize,

    /// 座標の量子化スケール（全軸共通）
    #[arg(long, default_value_t = dem2las::config::DEFAULT_SCALE)]
    scale: f64,

    /// 出力ファイルの拡張子
    #[arg(long, default_value = dem2las::config::DEFAULT_EXTENSION)]
    extension: String,

    /// 進捗バーを表示しない
    #[arg(long)]
    no_progress: bool,
}

fn main() -> Result<()> {
    // ログの初期化（stdoutは完了メッセージ用）
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // CLI引数の解析
    let args = Args::parse();

    let start_time = std::time::Instant::now();

    let config = ConversionConfig::new()
        .with_band(args.band)
        .with_no_data_value(args.nodata)
        .with_point_limit(args.limit)
        .with_scale(Vector3::splat(args.scale))
        .with_extension(args.extension.clone());

    info!("Processing raster: {:?}", args.input);

    // 入力ラスタを開く
    let source = GdalRaster::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let (_, height) = source.raster_size();

    let pb = ProgressBar::new(height as u64);
    if args.no_progress {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:50.cyan/blue}] {pos}/{len} rows ({percent}%) {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    let mut pipeline = Pipeline::new(config)
        .context("Invalid conversion settings")?
        .with_progress(|p| {
            pb.set_position(p.row as u64);
            // 最終フラッシュのログと重ならないように消しておく
            if p.row == p.total {
                pb.finish_and_clear();
            }
        });

    let summary = pipeline
        .run(&source, &args.output, LasWriter::new())
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;

    pb.finish_and_clear();

    // 処理時間を表示
    info!("Total processing time: {:?}", start_time.elapsed());

    println!(
        "Done! Wrote {} points into {} files",
        summary.total_points,
        summary.files.len()
    );

    Ok(())
}
