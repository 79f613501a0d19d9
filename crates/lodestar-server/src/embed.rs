use rust_embed::Embed;

/// Static assets compiled into the binary. The offline gateway reads these
/// through a [`crate::offline::Fetcher`] rather than serving them directly,
/// so cache behavior is uniform and testable.
#[derive(Embed)]
#[folder = "assets/"]
pub struct AppAssets;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_assets_are_embedded() {
        assert!(<AppAssets as Embed>::get("index.html").is_some());
        assert!(<AppAssets as Embed>::get("offline.html").is_some());
        assert!(<AppAssets as Embed>::get("manifest.webmanifest").is_some());
    }
}
