//! HTTP サーバーの例 (tokio + http11_deserializer)
//!
//! 受信したリクエストをパースしてログに出し、ボディなしのステータスだけを返す。
//!
//! 使い方:
//!   # HTTP サーバー (ポート 8080)
//!   cargo run -p http11_server
//!
//!   # chunked のリクエストも受け付ける
//!   cargo run -p http11_server -- --chunked
//!
//!   # パース過程のログを表示
//!   RUST_LOG=http11_deserializer=trace cargo run -p http11_server

use http11_deserializer::{Method, RequestMessage};
use tokio_http11_deserializer::{Reply, Server};
use tracing_subscriber::EnvFilter;

struct ServerOptions {
    port: u16,
    chunked: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = parse_args()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = format!("0.0.0.0:{}", options.port);
    let server = Server::bind(&addr).await?.accept_chunked(options.chunked);

    tracing::info!(%addr, chunked = options.chunked, "HTTP server listening");
    server.serve(handle_request).await?;
    Ok(())
}

fn parse_args() -> Result<ServerOptions, Box<dyn std::error::Error>> {
    let mut args = noargs::raw_args();
    args.metadata_mut().app_name = "http11_server";

    // --help フラグ
    noargs::HELP_FLAG.take_help(&mut args);

    // --version フラグ
    let version_flag: bool = noargs::flag("version")
        .short('V')
        .doc("Show version")
        .take(&mut args)
        .is_present();
    if version_flag {
        println!("{}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    // --chunked フラグ
    let chunked: bool = noargs::flag("chunked")
        .doc("Accept chunked request bodies")
        .take(&mut args)
        .is_present();

    // --port オプション
    let port: u16 = noargs::opt("port")
        .short('p')
        .doc("Port to listen on")
        .default("8080")
        .take(&mut args)
        .then(|o| o.value().parse())
        .map_err(|e| format!("{:?}", e))?;

    // 未知の引数があればエラー、ヘルプが返されたら表示
    if let Some(help) = args.finish().map_err(|e| format!("{:?}", e))? {
        print!("{}", help);
        std::process::exit(0);
    }

    Ok(ServerOptions { port, chunked })
}

async fn handle_request(request: RequestMessage) -> Reply {
    tracing::info!(
        method = %request.method,
        target = %request.target,
        version = %request.version,
        fields = request.fields.len(),
        body_len = request.body.len(),
        "request"
    );

    match request.method {
        Method::Get | Method::Head => Reply::OK,
        _ => Reply::NO_CONTENT,
    }
}
