//! Integration tests for playback resolution across the provider registry

use cinevault_core::MediaKind;
use cinevault_playback::{
    build_playback_url, registry, resolve_all, PlaybackOptions, PlaybackProviderId, Resolution,
    TitleIds,
};

#[test]
fn test_every_provider_resolves_a_film_with_tmdb_id() {
    let ids = TitleIds::new(Some(27205), None);

    for provider in registry() {
        let result = build_playback_url(
            provider.id,
            &ids,
            MediaKind::Film,
            None,
            None,
            &PlaybackOptions::default(),
        );
        let url = result
            .url()
            .unwrap_or_else(|| panic!("{} should resolve", provider.display_name));
        assert!(url.starts_with("https://"));
        assert!(url.contains("27205"));
    }
}

#[test]
fn test_series_urls_encode_season_and_episode() {
    let ids = TitleIds::new(Some(1396), None);
    let results = resolve_all(
        &ids,
        MediaKind::Series,
        Some(2),
        Some(5),
        &PlaybackOptions::default(),
    );

    let urls: Vec<_> = results
        .iter()
        .map(|(_, r)| r.url().unwrap().to_string())
        .collect();

    assert!(urls[0].starts_with("https://vidking.net/embed/tv/1396/2/5"));
    assert!(urls[1].starts_with("https://vidnest.net/embed/tv/1396/2/5"));
    assert_eq!(urls[2], "https://vidsrc.to/embed/tv/1396/2/5");
    assert_eq!(urls[3], "https://www.2embed.cc/embedtv/1396&s=2&e=5");
}

#[test]
fn test_empty_ids_unavailable_for_every_provider() {
    for provider in PlaybackProviderId::ALL {
        for kind in [MediaKind::Film, MediaKind::Series] {
            assert_eq!(
                build_playback_url(
                    provider,
                    &TitleIds::default(),
                    kind,
                    None,
                    None,
                    &PlaybackOptions::default()
                ),
                Resolution::Unavailable
            );
        }
    }
}

#[test]
fn test_caller_driven_switching_visits_every_provider_once() {
    let ids = TitleIds::new(None, Some("tt0903747".to_string()));
    let mut current = PlaybackProviderId::default();
    let mut seen = Vec::new();

    for _ in 0..registry().len() {
        seen.push((
            current,
            build_playback_url(
                current,
                &ids,
                MediaKind::Series,
                None,
                None,
                &PlaybackOptions::default(),
            )
            .is_available(),
        ));
        current = current.next();
    }

    assert_eq!(current, PlaybackProviderId::default());
    assert_eq!(
        seen,
        vec![
            (PlaybackProviderId::Vidking, false),
            (PlaybackProviderId::Vidnest, false),
            (PlaybackProviderId::Vidsrc, true),
            (PlaybackProviderId::TwoEmbed, true),
        ]
    );
}
