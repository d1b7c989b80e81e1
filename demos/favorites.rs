//! Walks through an anonymous session, a sign-in merge and a profile
//! picture upload against the in-memory stores.
//!
//! Run with `RUST_LOG=debug cargo run --example favorites` to see the
//! store traffic.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use shelfkeeper::{
    CompressionWorker, Config, Execution, FavoritesSync, ImageCompressor, ImageFile,
    InMemoryDocumentStore, InMemoryLocalStorage, ProfilePictures, ProfilesExt,
};
use std::error::Error;
use std::io::Cursor;
use std::sync::Arc;

fn cover(width: u32, height: u32) -> Result<Vec<u8>, Box<dyn Error>> {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    });
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(image).write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = Config::default();
    let local = Arc::new(InMemoryLocalStorage::new());
    let remote = Arc::new(InMemoryDocumentStore::new());
    remote
        .profiles()
        .merge_favorites("reader-1", &["dune".to_string(), "emma".to_string()])?;

    let sync = FavoritesSync::new(
        Arc::clone(&local),
        Arc::clone(&remote),
        config.favorites.clone(),
    );
    let mut watching = sync.is_favorite("dune");

    sync.add("dune").wait();
    sync.add("ulysses").wait();
    println!("anonymous favorites: {:?}", sync.current_favorites());

    let outcome = sync.sign_in("reader-1").wait();
    println!("sign-in merge: {:?}", outcome);
    println!("merged favorites: {:?}", sync.current_favorites());
    println!("dune is a favorite: {:?}", watching.latest());

    let worker = CompressionWorker::spawn();
    let pictures = ProfilePictures::new(Arc::clone(&remote), ImageCompressor::new(config.images));
    let file = ImageFile::new("cover.png", "image/png", cover(1200, 800)?);

    match pictures.upload(Some("reader-1"), &file, Execution::Worker(&worker)) {
        Ok(compressed) => println!(
            "stored {}x{} picture, about {}KB",
            compressed.dimensions.width, compressed.dimensions.height, compressed.estimated_kb
        ),
        Err(err) => println!("upload failed: {}", err.user_message()),
    }

    let stats = worker.stop();
    println!("worker encoded {} image(s)", stats.requests_encoded);
    Ok(())
}
