//! Unit tests for the catalog store and its refresher.

use super::*;
use crate::catalog::make_test_entry;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn write_price_file(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn fast_config(dir: &Path) -> RefreshConfig {
    RefreshConfig::new(dir).with_interval(Duration::from_millis(10))
}

/// Snapshot whose every entry carries `generation` as its price, so a mixed
/// view would show up as differing prices or an unexpected length
fn tagged_snapshot(tag: i64) -> CatalogSnapshot {
    let len = (tag % 7 + 1) as usize;
    let entries = (0..len)
        .map(|i| make_test_entry(&format!("item {i}"), tag, 1, "price.csv"))
        .collect();
    CatalogSnapshot::new(entries, vec!["price.csv".to_string()])
}

async fn wait_for_generation(store: &CatalogStore, generation: u64) {
    for _ in 0..500 {
        if store.generation() >= generation {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("generation {generation} was never published");
}

mod publish_tests {
    use super::*;

    #[test]
    fn starts_with_empty_snapshot() {
        let store = CatalogStore::new();
        assert!(store.current().is_empty());
        assert_eq!(store.generation(), 0);
        assert!(store.search("молоко").is_empty());
    }

    #[test]
    fn publish_bumps_generation() {
        let store = CatalogStore::new();
        assert_eq!(store.publish(tagged_snapshot(1)), 1);
        assert_eq!(store.publish(tagged_snapshot(2)), 2);
        assert_eq!(store.generation(), 2);
        assert_eq!(store.current().generation(), 2);
    }

    #[test]
    fn readers_keep_their_snapshot_after_publish() {
        let store = CatalogStore::new();
        store.publish(tagged_snapshot(3));
        let held = store.current();

        store.publish(tagged_snapshot(4));

        assert_eq!(held.generation(), 1);
        assert!(held.iter().all(|e| e.price == 3));
        assert!(store.current().iter().all(|e| e.price == 4));
    }

    #[test]
    fn search_reads_current_snapshot() {
        let store = CatalogStore::new();
        store.publish(CatalogSnapshot::new(
            vec![
                make_test_entry("Сыр твёрдый", 900, 1, "price1.csv"),
                make_test_entry("Сыр мягкий", 1000, 2, "price2.csv"),
            ],
            vec!["price1.csv".to_string(), "price2.csv".to_string()],
        ));

        let results = store.search("СЫР");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Сыр мягкий");
        assert_eq!(results[0].unit_price, 500);
    }

    #[test]
    fn concurrent_readers_never_see_mixed_snapshots() {
        let store = Arc::new(CatalogStore::new());
        let done = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                let done = Arc::clone(&done);
                thread::spawn(move || {
                    let mut last_generation = 0;
                    let mut reads = 0u64;
                    while !done.load(Ordering::Acquire) {
                        let snapshot = store.current();
                        assert!(snapshot.generation() >= last_generation);
                        last_generation = snapshot.generation();
                        assert!(store.generation() >= snapshot.generation());

                        if let Some(first) = snapshot.entries().first() {
                            let tag = first.price;
                            assert!(snapshot.iter().all(|e| e.price == tag));
                            assert_eq!(snapshot.len(), (tag % 7 + 1) as usize);
                        }
                        reads += 1;
                    }
                    reads
                })
            })
            .collect();

        for tag in 1..=2000 {
            store.publish(tagged_snapshot(tag));
        }
        done.store(true, Ordering::Release);

        for reader in readers {
            assert!(reader.join().unwrap() > 0);
        }
        assert_eq!(store.generation(), 2000);
    }
}

mod refresh_once_tests {
    use super::*;

    #[test]
    fn builds_and_publishes_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_price_file(
            dir.path(),
            "price1.csv",
            "Наименование,Цена,Вес\nМолоко,50,2\nХлеб,,1\n",
        );
        write_price_file(dir.path(), "notes.csv", "товар,цена,вес\nСоль,10,1\n");

        let store = CatalogStore::new();
        let outcome = store.refresh_once(&RefreshConfig::new(dir.path())).unwrap();

        assert_eq!(outcome.generation, 1);
        assert_eq!(outcome.entries, 1);
        assert_eq!(outcome.warnings.len(), 1);

        let snapshot = store.current();
        assert_eq!(snapshot.entries()[0].name, "Молоко");
        assert_eq!(snapshot.entries()[0].unit_price, 25);
    }

    #[test]
    fn listing_failure_keeps_last_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        write_price_file(dir.path(), "price.csv", "товар,цена,вес\nСоль,10,1\n");

        let store = CatalogStore::new();
        store.refresh_once(&RefreshConfig::new(dir.path())).unwrap();

        let missing = dir.path().join("gone");
        let result = store.refresh_once(&RefreshConfig::new(&missing));

        assert!(matches!(result, Err(crate::error::CatalogError::Listing { .. })));
        assert_eq!(store.generation(), 1);
        assert_eq!(store.current().len(), 1);
    }
}

mod refresher_tests {
    use super::*;

    /// Blocks inside `read_rows` until the test releases it
    struct GatedSource {
        entered: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl TabularSource for GatedSource {
        fn read_rows(&self, _path: &Path) -> Result<Vec<Vec<String>>> {
            let _ = self.entered.lock().unwrap().send(());
            let _ = self.release.lock().unwrap().recv();
            Ok(vec![
                vec!["товар".into(), "цена".into(), "вес".into()],
                vec!["Мёд".into(), "900".into(), "2".into()],
            ])
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn refresher_publishes_and_stops() {
        let dir = tempfile::tempdir().unwrap();
        write_price_file(dir.path(), "price.csv", "товар,цена,вес\nСоль,10,1\n");

        let store = Arc::new(CatalogStore::new());
        assert!(store.start(fast_config(dir.path())));
        assert!(store.is_running());

        wait_for_generation(&store, 2).await;
        store.stop().await;
        assert!(!store.is_running());

        let generation = store.generation();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.generation(), generation);
        assert_eq!(store.search("соль").len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn refresher_picks_up_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        write_price_file(dir.path(), "price.csv", "товар,цена,вес\nСоль,10,1\n");

        let store = Arc::new(CatalogStore::new());
        store.start(fast_config(dir.path()));
        wait_for_generation(&store, 1).await;

        write_price_file(dir.path(), "price2.csv", "товар,цена,вес\nСоль морская,30,1\n");

        for _ in 0..500 {
            if store.search("соль").len() == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        store.stop().await;

        assert_eq!(store.search("соль").len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn missing_directory_does_not_kill_refresher() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("later");

        let store = Arc::new(CatalogStore::new());
        store.start(fast_config(&missing));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.generation(), 0);
        assert!(store.is_running());

        fs::create_dir(&missing).unwrap();
        write_price_file(&missing, "price.csv", "товар,цена,вес\nСоль,10,1\n");
        wait_for_generation(&store, 1).await;
        store.stop().await;

        assert_eq!(store.current().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn start_and_stop_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(CatalogStore::new());

        store.stop().await;
        assert!(store.start(fast_config(dir.path())));
        assert!(!store.start(fast_config(dir.path())));

        store.stop().await;
        store.stop().await;
        assert!(!store.is_running());

        assert!(store.start(fast_config(dir.path())));
        store.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn stop_waits_for_in_flight_build() {
        let dir = tempfile::tempdir().unwrap();
        write_price_file(dir.path(), "price.csv", "");

        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let source = GatedSource {
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        };

        let store = Arc::new(CatalogStore::with_source(Arc::new(source)));
        store.start(fast_config(dir.path()));

        tokio::task::spawn_blocking(move || entered_rx.recv())
            .await
            .unwrap()
            .unwrap();

        let stopping = Arc::clone(&store);
        let stopper = tokio::spawn(async move { stopping.stop().await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!stopper.is_finished());
        assert_eq!(store.generation(), 0);

        release_tx.send(()).unwrap();
        drop(release_tx);
        stopper.await.unwrap();

        assert_eq!(store.generation(), 1);
        let snapshot = store.current();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.entries()[0].unit_price, 450);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.generation(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn start_refused_while_stopped_refresher_finishes_build() {
        let dir = tempfile::tempdir().unwrap();
        write_price_file(dir.path(), "price.csv", "");

        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let source = GatedSource {
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        };

        let store = Arc::new(CatalogStore::with_source(Arc::new(source)));
        assert!(store.start(fast_config(dir.path())));

        tokio::task::spawn_blocking(move || entered_rx.recv())
            .await
            .unwrap()
            .unwrap();

        let stopping = Arc::clone(&store);
        let stopper = tokio::spawn(async move { stopping.stop().await });
        tokio::time::sleep(Duration::from_millis(50)).await;

        // the cancelled refresher is still inside its build
        assert!(!store.start(fast_config(dir.path())));
        assert!(store.is_running());

        release_tx.send(()).unwrap();
        drop(release_tx);
        stopper.await.unwrap();

        assert!(!store.is_running());
        assert_eq!(store.generation(), 1);

        // later builds no longer block once the release channel is closed
        assert!(store.start(fast_config(dir.path())));
        wait_for_generation(&store, 2).await;
        store.stop().await;
        assert!(!store.is_running());
    }
}
