mod common;

use anyhow::Result;
use homelab_api::database::models::{AssetChanges, NewAsset};
use homelab_api::database::{AssetRepository, DatabaseError, PgAssetRepository};
use homelab_api::filter::{AssetFilter, FilterError};
use homelab_api::validation::AssetType;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

fn new_asset(name: &str) -> NewAsset {
    NewAsset {
        name: name.to_string(),
        ..Default::default()
    }
}

fn page(limit: i64, offset: i64) -> AssetFilter {
    let mut filter = AssetFilter {
        limit,
        offset,
        sort_by: "name".into(),
        sort_order: "asc".into(),
        ..Default::default()
    };
    filter.set_defaults(20);
    filter
}

#[tokio::test]
async fn invalid_sort_fails_without_touching_the_database() -> Result<()> {
    // Nothing listens here; any executed query would surface as a driver error.
    let pool = PgPoolOptions::new().connect_lazy("postgres://nobody@127.0.0.1:1/none")?;
    let repo = PgAssetRepository::new(pool);

    for sort_by in ["hostname", "name; DROP TABLE assets; --", "created_at DESC, (SELECT 1)"] {
        let mut filter = AssetFilter { sort_by: sort_by.into(), ..Default::default() };
        filter.set_defaults(20);
        let err = repo.list("alice", &filter).await.unwrap_err();
        assert!(
            matches!(err, DatabaseError::Filter(FilterError::InvalidSortColumn(_))),
            "unexpected error for {:?}: {}",
            sort_by,
            err
        );
    }

    let mut filter = AssetFilter { sort_order: "desc; --".into(), ..Default::default() };
    filter.set_defaults(20);
    assert!(matches!(
        repo.list("alice", &filter).await,
        Err(DatabaseError::Filter(FilterError::InvalidSortOrder(_)))
    ));
    Ok(())
}

#[tokio::test]
async fn assets_are_scoped_to_their_tenant() -> Result<()> {
    let Some(pool) = common::test_pool().await? else { return Ok(()) };
    let repo = PgAssetRepository::new(pool);
    let alice = common::tenant("alice");
    let bob = common::tenant("bob");

    let asset = repo
        .create(
            &alice,
            &NewAsset {
                name: "prod-server".into(),
                asset_type: Some(AssetType::Server),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(asset.tenant, alice);
    assert_eq!(asset.asset_type.as_deref(), Some("server"));
    assert!(asset.hostname.is_none());
    assert!(asset.metadata.is_none());

    assert_eq!(repo.get_by_id(&alice, asset.id).await?.name, "prod-server");

    let not_found = |r: Result<_, DatabaseError>| matches!(r, Err(DatabaseError::NotFound(ref m)) if m == "asset not found");
    assert!(not_found(repo.get_by_id(&bob, asset.id).await.map(|_| ())));
    assert!(not_found(repo.update(&bob, asset.id, &AssetChanges::default()).await.map(|_| ())));
    assert!(not_found(repo.delete(&bob, asset.id).await));
    assert!(not_found(repo.get_by_id(&alice, Uuid::new_v4()).await.map(|_| ())));

    let filter = page(0, 0);
    assert_eq!(repo.count(&bob, &filter).await?, 0);
    assert!(repo.list(&bob, &filter).await?.is_empty());

    repo.delete(&alice, asset.id).await?;
    assert!(not_found(repo.delete(&alice, asset.id).await));
    Ok(())
}

#[tokio::test]
async fn update_only_touches_present_fields() -> Result<()> {
    let Some(pool) = common::test_pool().await? else { return Ok(()) };
    let repo = PgAssetRepository::new(pool);
    let alice = common::tenant("alice");

    let asset = repo
        .create(
            &alice,
            &NewAsset {
                name: "nas".into(),
                asset_type: Some(AssetType::Nas),
                hostname: Some("old.host".into()),
                metadata: Some(json!({ "disks": 4 })),
            },
        )
        .await?;

    let same = repo.update(&alice, asset.id, &AssetChanges::default()).await?;
    assert_eq!(same.name, "nas");
    assert_eq!(same.hostname.as_deref(), Some("old.host"));
    assert!(same.updated_at >= asset.updated_at);
    assert_eq!(same.created_at, asset.created_at);

    let cleared = repo
        .update(
            &alice,
            asset.id,
            &AssetChanges {
                hostname: Some(String::new()),
                metadata: Some(json!({})),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(cleared.hostname.as_deref(), Some(""));
    assert_eq!(cleared.metadata, Some(json!({})));
    assert_eq!(cleared.name, "nas");
    assert_eq!(cleared.asset_type.as_deref(), Some("nas"));

    let renamed = repo
        .update(
            &alice,
            asset.id,
            &AssetChanges {
                name: Some("nas-01".into()),
                asset_type: Some(AssetType::Other),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(renamed.name, "nas-01");
    assert_eq!(renamed.asset_type.as_deref(), Some("other"));
    assert_eq!(renamed.hostname.as_deref(), Some(""));
    Ok(())
}

#[tokio::test]
async fn pages_add_up_to_the_count() -> Result<()> {
    let Some(pool) = common::test_pool().await? else { return Ok(()) };
    let repo = PgAssetRepository::new(pool);
    let alice = common::tenant("alice");

    for i in 0..7 {
        repo.create(&alice, &new_asset(&format!("host-{:02}", i))).await?;
    }

    let total = repo.count(&alice, &page(3, 0)).await?;
    assert_eq!(total, 7);

    let mut names = Vec::new();
    let mut offset = 0;
    loop {
        let filter = page(3, offset);
        let rows = repo.list(&alice, &filter).await?;
        assert!(repo.count(&alice, &filter).await? >= rows.len() as i64);
        if rows.is_empty() {
            break;
        }
        names.extend(rows.into_iter().map(|a| a.name));
        offset += 3;
    }
    assert_eq!(names.len() as i64, total);
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    Ok(())
}

#[tokio::test]
async fn type_and_search_filters() -> Result<()> {
    let Some(pool) = common::test_pool().await? else { return Ok(()) };
    let repo = PgAssetRepository::new(pool);
    let alice = common::tenant("alice");

    repo.create(
        &alice,
        &NewAsset {
            name: "Prod-DB".into(),
            asset_type: Some(AssetType::Vm),
            ..Default::default()
        },
    )
    .await?;
    repo.create(
        &alice,
        &NewAsset {
            name: "edge".into(),
            asset_type: Some(AssetType::Network),
            hostname: Some("prod-router.lan".into()),
            ..Default::default()
        },
    )
    .await?;
    repo.create(&alice, &new_asset("100%_uptime")).await?;

    let mut filter = AssetFilter { search: Some("prod".into()), ..Default::default() };
    filter.set_defaults(20);
    assert_eq!(repo.count(&alice, &filter).await?, 2);

    filter.asset_type = Some("vm".into());
    let rows = repo.list(&alice, &filter).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Prod-DB");

    // Wildcards in the search term match literally.
    let mut filter = AssetFilter { search: Some("%_".into()), ..Default::default() };
    filter.set_defaults(20);
    let rows = repo.list(&alice, &filter).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "100%_uptime");
    Ok(())
}
