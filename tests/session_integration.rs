//! Session integration tests
//!
//! Drive `ExplorerSession` end to end against the in-memory `FakeSource`.
//! Run with: cargo test --test session_integration

mod helpers;

use helpers::{dataset, FakeSource};
use pretty_assertions::assert_eq;
use seabed_explorer::{
    DetailPanel, Dimension, ExplorerConfig, ExplorerSession, ExportScope, FilterKey, MapEvent,
    RefreshOutcome, SyncOutcome, ZoomTarget,
};
use std::sync::Arc;
use std::time::Duration;

async fn loaded_session() -> (ExplorerSession, Arc<FakeSource>) {
    let source = Arc::new(FakeSource::new(dataset()));
    let mut session = ExplorerSession::new(source.clone());
    assert_eq!(
        session.refresh().await,
        RefreshOutcome::Applied {
            replaced_original: true
        }
    );
    session.load_options().await.unwrap();
    (session, source)
}

fn cruise_ids(session: &ExplorerSession) -> Vec<i64> {
    session.data().cruises.iter().map(|c| c.cruise_id).collect()
}

fn contractor_ids(session: &ExplorerSession) -> Vec<i64> {
    session
        .data()
        .contractors
        .iter()
        .map(|c| c.contractor_id)
        .collect()
}

#[tokio::test]
async fn test_mineral_type_filter_keeps_matching_contractor() {
    let (mut session, source) = loaded_session().await;

    let outcome = session.set_filter(FilterKey::MineralTypeId, Some("1")).await;
    assert_eq!(outcome, SyncOutcome::Rederived);
    assert_eq!(contractor_ids(&session), vec![1]);
    assert_eq!(cruise_ids(&session), vec![10, 11]);

    // recomputed locally; only the initial unfiltered fetch hit the source
    assert_eq!(source.request_count(), 1);
}

#[tokio::test]
async fn test_unset_filter_restores_original_by_reference() {
    let source = Arc::new(FakeSource::new(helpers::single_contractor()));
    let mut session = ExplorerSession::new(source.clone());
    session.refresh().await;

    session.set_filter(FilterKey::ContractorId, Some("2")).await;
    assert!(session.data().contractors.is_empty());
    assert!(!Arc::ptr_eq(session.data(), session.original().unwrap()));

    let outcome = session.set_filter(FilterKey::ContractorId, None).await;
    assert_eq!(outcome, SyncOutcome::ResetToOriginal);
    assert!(Arc::ptr_eq(session.data(), session.original().unwrap()));
}

#[tokio::test]
async fn test_all_sentinel_clears_filter() {
    let (mut session, _source) = loaded_session().await;
    session.set_filter(FilterKey::SponsoringState, Some("Japan")).await;
    assert_eq!(contractor_ids(&session), vec![2]);

    session.set_filter(FilterKey::SponsoringState, Some("all")).await;
    assert!(session.filters().is_empty());
    assert!(Arc::ptr_eq(session.data(), session.original().unwrap()));
}

#[tokio::test]
async fn test_fetch_failure_leaves_empty_valid_state() {
    let source = Arc::new(FakeSource::failing(dataset()));
    let mut session = ExplorerSession::new(source);

    assert_eq!(session.refresh().await, RefreshOutcome::Failed);
    assert!(session.data().is_empty());
    assert!(session.original().is_none());
    assert!(session.error().is_some());
    assert!(!session.cache().is_loading());
}

#[tokio::test]
async fn test_filter_before_first_load_fetches_with_wire_names() {
    let source = Arc::new(FakeSource::new(dataset()));
    let mut session = ExplorerSession::new(source.clone());

    let outcome = session.set_filter(FilterKey::MineralTypeId, Some("2")).await;
    assert_eq!(outcome, SyncOutcome::FetchRequired);
    assert_eq!(source.request_count(), 1);

    let params = source.last_request().unwrap();
    assert_eq!(params.get("contractTypeId"), Some("2"));
    // a filtered response never becomes the original
    assert!(session.original().is_none());
}

#[tokio::test]
async fn test_cruise_filter_forces_cruise_in() {
    let (mut session, _source) = loaded_session().await;
    session.set_filter(FilterKey::SponsoringState, Some("France")).await;
    session.set_filter(FilterKey::CruiseId, Some("20")).await;

    assert!(cruise_ids(&session).contains(&20));
    assert!(contractor_ids(&session).contains(&2));
}

#[tokio::test]
async fn test_select_contractor_emits_events_and_zoom() {
    let (mut session, _source) = loaded_session().await;
    let subscription = session.events().subscribe();

    session.select_contractor(2).await;

    assert_eq!(session.filters().get(FilterKey::ContractorId), Some("2"));
    assert_eq!(cruise_ids(&session), vec![20]);
    assert_eq!(session.selection().panel, Some(DetailPanel::Contractor));

    let events = subscription.drain();
    assert_eq!(events[0], MapEvent::ShowCruises(2));
    assert!(matches!(events[1], MapEvent::ZoomTo(ZoomTarget::Bounds(_))));

    session.map_zoomed();
    assert!(session.selection().pending_zoom().is_none());
}

#[tokio::test]
async fn test_manual_move_suppresses_smart_zoom() {
    let (mut session, _source) = loaded_session().await;
    let subscription = session.events().subscribe();

    session.select_contractor(1).await;
    session.user_moved_map();
    subscription.drain();

    session.select_station(101);
    let events = subscription.drain();
    assert_eq!(events[0], MapEvent::FocusStation(101));
    // a new explicit selection re-arms zoom
    assert!(matches!(events[1], MapEvent::ZoomTo(ZoomTarget::Point(_))));
    assert_eq!(session.selection().cruise, Some(10));
}

#[tokio::test]
async fn test_reset_filters_clears_selection_and_publishes_reset() {
    let (mut session, _source) = loaded_session().await;
    let subscription = session.events().subscribe();
    session.select_cruise(11).await;
    subscription.drain();

    let outcome = session.reset_filters().await;
    assert_eq!(outcome, SyncOutcome::ResetToOriginal);
    assert!(session.selection().cruise.is_none());
    assert!(session.selection().panel.is_none());
    assert_eq!(subscription.drain(), vec![MapEvent::ResetView]);
    assert!(Arc::ptr_eq(session.data(), session.original().unwrap()));
}

#[tokio::test]
async fn test_analytics_panels() {
    let (mut session, _source) = loaded_session().await;

    session.open_contractor_summary(1).await.unwrap();
    let summary = session.selection().contractor_summary.clone().unwrap();
    assert_eq!(summary.total_cruises, 2);
    assert_eq!(
        session.selection().panel,
        Some(DetailPanel::ContractorSummary)
    );

    session.open_block_analytics(7).await.unwrap();
    assert_eq!(session.selection().panel, Some(DetailPanel::BlockAnalytics));

    session.close_panel();
    assert!(session.selection().panel.is_none());

    assert!(session.open_contractor_summary(99).await.is_err());
}

#[tokio::test]
async fn test_availability_follows_filters() {
    let (mut session, _source) = loaded_session().await;
    session.set_filter(FilterKey::MineralTypeId, Some("1")).await;

    let availability = session.availability();
    // sole active dimension keeps every option selectable
    assert_eq!(
        availability.enabled_values(Dimension::MineralType),
        vec!["1", "2"]
    );
    assert_eq!(availability.enabled_values(Dimension::Contractor), vec!["1"]);
    assert_eq!(
        availability.enabled_values(Dimension::SponsoringState),
        vec!["France"]
    );

    session.set_filter(FilterKey::Year, Some("2001")).await;
    let availability = session.availability();
    assert_eq!(
        availability.enabled_values(Dimension::MineralType),
        vec!["1"]
    );
}

#[tokio::test]
async fn test_export_of_filtered_and_scoped_data() {
    let (mut session, _source) = loaded_session().await;
    session.set_filter(FilterKey::SponsoringState, Some("France")).await;

    let csv = session.export_csv(ExportScope::Cruise(11)).unwrap();
    assert!(csv.contains("\r\n11;1;Cruise 11;"));
    assert!(!csv.contains("\r\n10;1;Cruise 10;"));

    // contractor 2 was filtered out of the current snapshot
    assert!(session.export_csv(ExportScope::Contractor(2)).is_err());

    let dir = tempfile::tempdir().unwrap();
    let date = chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let path = session
        .write_export(dir.path(), "map-data", date, ExportScope::All)
        .unwrap();
    assert_eq!(path.file_name().unwrap(), "map-data-2024-05-01.csv");
}

#[tokio::test]
async fn test_switching_contractor_drops_foreign_cruise_filter() {
    let (mut session, _source) = loaded_session().await;
    session.select_cruise(20).await;
    assert_eq!(session.filters().get(FilterKey::CruiseId), Some("20"));

    session.select_contractor(1).await;

    assert_eq!(session.filters().get(FilterKey::CruiseId), None);
    assert_eq!(session.filters().get(FilterKey::ContractorId), Some("1"));
    assert!(session.selection().cruise.is_none());
    assert_eq!(contractor_ids(&session), vec![1]);
    assert_eq!(cruise_ids(&session), vec![10, 11]);
}

#[tokio::test]
async fn test_reselecting_owner_keeps_cruise_filter() {
    let (mut session, _source) = loaded_session().await;
    session.select_cruise(11).await;

    session.select_contractor(1).await;

    assert_eq!(session.filters().get(FilterKey::CruiseId), Some("11"));
    assert_eq!(session.selection().cruise, Some(11));
    assert_eq!(cruise_ids(&session), vec![10, 11]);
}

#[tokio::test]
async fn test_search_applies_only_last_text_after_debounce() {
    let source = Arc::new(FakeSource::new(dataset()));
    let config = ExplorerConfig {
        search_debounce: Duration::from_millis(20),
        ..Default::default()
    };
    let mut session = ExplorerSession::with_config(source.clone(), &config);
    session.refresh().await;

    session.type_search("b");
    session.type_search("abys");
    assert!(session.search_pending());
    // nothing reaches the filters before the quiet period ends
    assert!(session.filters().get(FilterKey::Search).is_none());

    assert_eq!(session.settle_search().await, SyncOutcome::Rederived);
    assert_eq!(session.filters().get(FilterKey::Search), Some("abys"));
    assert_eq!(contractor_ids(&session), vec![1]);

    // a second settle with nothing typed is a no-op
    assert_eq!(session.settle_search().await, SyncOutcome::Unchanged);
    assert_eq!(source.request_count(), 1);
}

#[tokio::test]
async fn test_reset_discards_pending_search() {
    let (mut session, _source) = loaded_session().await;
    session.type_search("benthic");
    session.reset_filters().await;

    assert_eq!(session.settle_search().await, SyncOutcome::Unchanged);
    assert!(session.filters().is_empty());
}
