//! # 汽车示例
//!
//! 演示依赖注入容器的各种绑定方式：链接、单例、实例、提供者方法与限定符。

mod cars;
mod scenarios;

use anyhow::Context;
use clap::Parser;
use di_abstractions::ContainerConfig;
use scenarios::Example;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "car-demo")]
#[command(about = "依赖注入容器汽车示例")]
struct Args {
    /// 要运行的示例
    #[arg(short, long, value_enum, default_value_t = Example::All)]
    example: Example,

    /// 容器配置文件路径（JSON）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志，RUST_LOG 优先
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let config = load_config(args.config.as_deref())?;
    info!("容器配置: {:?}", config);

    let examples: &[Example] = match args.example {
        Example::All => &Example::EACH,
        ref single => std::slice::from_ref(single),
    };

    for &example in examples {
        let speed = scenarios::run(example, &config)
            .with_context(|| format!("示例 {example} 运行失败"))?;
        println!("{}", scenarios::describe(example, speed));
    }
    Ok(())
}

/// 加载容器配置，环境变量 `CAR_DEMO_*` 覆盖文件中的值
fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<ContainerConfig> {
    let config = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("无法读取配置文件 {}", path.display()))?;
            ContainerConfig::from_json_str(&json)
                .with_context(|| format!("配置文件格式错误 {}", path.display()))?
        }
        None => ContainerConfig::default(),
    };
    Ok(config.with_env_overrides("CAR_DEMO"))
}
