use anyhow::Result;
use std::env;
use std::sync::{Arc, Mutex};
use t1disk::{Client, ClientConfig};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = env::args().collect::<Vec<_>>();

    match args.as_slice() {
        [_, login, password, remote_path, local_path] => {
            let client = Client::new(ClientConfig::from_env()?)?;
            let session = client.login_session(login, password).await?;
            let name = remote_path.clone();

            let descriptor = session
                .upload_to_t1disk_with_progress(
                    remote_path,
                    local_path,
                    false,
                    Some(Arc::new(Mutex::new(move |pos: u64, total: u64| {
                        println!("{name}: {pos}/{total}");
                    }))),
                )
                .await?;

            println!("confirmed: {}", descriptor.confirm_url);
            Ok(())
        }
        _ => panic!(
            "
        Please set T1DISK_BASE_URL and input login, password, remote path and local file path
        Example:
            T1DISK_BASE_URL=https://disk.example.com/api cargo run --example upload user@example.com secret /backup/notes.txt notes.txt
        "
        ),
    }
}
