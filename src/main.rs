//! RAX FTP Publisher - Entry Point
//!
//! Checks every configured host, then runs the optional publish job:
//! enter the target directory, clean it if asked, and upload the files.

use std::path::Path;
use std::process;

use log::{error, info};

use rax_ftp_publisher::config::PublishConfig;
use rax_ftp_publisher::error::handlers::{describe_error, handle_error};
use rax_ftp_publisher::transport::FtpControlChannel;
use rax_ftp_publisher::{
    FtpClient, FtpClientError, HostConfig, HostRegistry, PublisherConfig, create_client,
    test_connection,
};

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    let config = match PublisherConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let registry = HostRegistry::from_hosts(config.hosts.clone());
    info!("Loaded {} host(s)", registry.len());

    let mut failed = false;
    for host in &config.hosts {
        match test_connection(host, None).await {
            Ok(()) => info!("Host {} is reachable", host.name),
            Err(e) => {
                error!("Connection test for {} failed: {}", host.name, describe_error(&e));
                failed = true;
            }
        }
    }

    if let Some(publish) = &config.publish {
        let result = match registry.get(&publish.host) {
            Some(host) => publish_files(host, publish).await,
            None => Err(FtpClientError::Config(format!(
                "unknown host {}",
                publish.host
            ))),
        };
        if let Err(e) = result {
            handle_error(&e);
            failed = true;
        }
    }

    if failed {
        process::exit(1);
    }
}

async fn publish_files(host: &HostConfig, publish: &PublishConfig) -> Result<(), FtpClientError> {
    info!("Publishing to {}", host.name);
    let mut client = create_client(host, publish.credentials.as_ref()).await?;

    match upload(&mut client, publish).await {
        Ok(()) => client.disconnect().await,
        Err(e) => {
            client.disconnect_quietly().await;
            Err(e)
        }
    }
}

async fn upload(
    client: &mut FtpClient<FtpControlChannel>,
    publish: &PublishConfig,
) -> Result<(), FtpClientError> {
    let transfer = &publish.transfer;

    if let Some(directory) = transfer.remote_directory() {
        client.change_or_make_directory(directory).await?;
    }

    if transfer.clean_remote {
        client.delete_tree().await?;
    }

    client.begin_transfers(transfer).await?;

    for source in transfer.source_paths() {
        let path = Path::new(source);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| FtpClientError::Config(format!("not a file: {}", source)))?;
        let mut file = tokio::fs::File::open(path).await?;
        client.transfer_file(&name, &mut file).await?;
    }

    Ok(())
}
