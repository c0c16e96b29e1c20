//! Embeds the source revision as GIT_HASH (reported by /health and startup logs)
//! and generates the `emergency.EmergencyService` gRPC stubs.
//!
//! The stubs are described in Rust rather than compiled from a .proto file,
//! so no protoc is needed. Messages are the prost structs in `domain::alert`.

use std::process::Command;
use tonic_build::manual::{Builder, Method, Service};

fn unary(name: &str, route_name: &str, input: &str, output: &str) -> Method {
    Method::builder()
        .name(name)
        .route_name(route_name)
        .input_type(format!("crate::domain::alert::{input}"))
        .output_type(format!("crate::domain::alert::{output}"))
        .codec_path("tonic::codec::ProstCodec")
        .build()
}

fn main() {
    let described = Command::new("git").args(["describe", "--always", "--dirty"]).output();

    let git_hash = match described {
        Ok(output) if output.status.success() => String::from_utf8_lossy(&output.stdout).trim().to_string(),
        _ => String::from("unknown"),
    };

    println!("cargo:rustc-env=GIT_HASH={git_hash}");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
    println!("cargo:rerun-if-changed=build.rs");

    let emergency = Service::builder()
        .name("EmergencyService")
        .package("emergency")
        .method(unary("send_alert", "SendAlert", "AlertRequest", "AlertResponse"))
        .method(unary("get_alerts", "GetAlerts", "Empty", "AlertList"))
        .build();

    Builder::new().compile(&[emergency]);
}
