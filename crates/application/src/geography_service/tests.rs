use std::sync::Arc;

use relevar_core::{AppError, UserIdentity};
use relevar_domain::{
    DepartmentId, DistrictId, NeighborhoodStatus, Permission, RequestKind, SurveyRequest,
};

use crate::test_support::FakeStore;
use crate::{
    AuthorizationService, CreateDistrictInput, NeighborhoodFilter, NotificationService,
    SaveNeighborhoodInput,
};

use super::GeographyService;

fn service(store: &Arc<FakeStore>) -> GeographyService {
    GeographyService::new(
        AuthorizationService::new(store.clone()),
        store.clone(),
        NotificationService::new(store.clone(), store.clone()),
    )
}

async fn manager(store: &FakeStore) -> UserIdentity {
    store
        .seed_user("planner", &[Permission::GeographyManage], false)
        .await
}

fn neighborhood_input(name: &str, district_ids: Vec<DistrictId>) -> SaveNeighborhoodInput {
    SaveNeighborhoodInput {
        name: name.to_owned(),
        status: NeighborhoodStatus::Active,
        parent_property: None,
        parent_registry: None,
        district_ids,
    }
}

#[tokio::test]
async fn departments_receive_sequential_codes_and_reuse_gaps() {
    let store = Arc::new(FakeStore::default());
    let actor = manager(&store).await;
    let service = service(&store);

    let mut created = Vec::new();
    for name in ["Central", "Norte", "Sur"] {
        let department = service.create_department(&actor, name).await;
        assert!(department.is_ok());
        if let Ok(department) = department {
            created.push(department);
        }
    }

    let codes: Vec<u32> = created.iter().map(|row| row.code().value()).collect();
    assert_eq!(codes, vec![1, 2, 3]);

    assert!(service.delete_department(&actor, created[1].id()).await.is_ok());
    let reused = service.create_department(&actor, "Este").await;
    assert!(matches!(reused, Ok(ref department) if department.code().value() == 2));
}

#[tokio::test]
async fn department_creation_requires_permission() {
    let store = Arc::new(FakeStore::default());
    let guest = store.seed_user("guest", &[], false).await;
    let service = service(&store);

    let result = service.create_department(&guest, "Central").await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(store.departments.lock().await.is_empty());
}

#[tokio::test]
async fn department_changes_notify_other_administrators() {
    let store = Arc::new(FakeStore::default());
    let actor = store.seed_user("root", &[], true).await;
    let other = store.seed_user("admin", &[], true).await;
    let service = service(&store);

    let department = service.create_department(&actor, "Central").await;
    assert!(department.is_ok());
    let Ok(department) = department else {
        return;
    };
    assert!(
        service
            .rename_department(&actor, department.id(), "Capital")
            .await
            .is_ok()
    );

    assert!(store.notifications_for(&actor).await.is_empty());
    let received = store.notifications_for(&other).await;
    assert_eq!(received.len(), 2);
    assert!(received[1].message.contains("'Capital'"));
}

#[tokio::test]
async fn duplicate_department_name_is_a_conflict() {
    let store = Arc::new(FakeStore::default());
    let actor = manager(&store).await;
    let service = service(&store);

    assert!(service.create_department(&actor, "Central").await.is_ok());
    let duplicate = service.create_department(&actor, "Central").await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn delete_guards_protect_populated_parents() {
    let store = Arc::new(FakeStore::default());
    let actor = manager(&store).await;
    let service = service(&store);

    let Ok(department) = service.create_department(&actor, "Central").await else {
        return;
    };
    let Ok(district) = service
        .create_district(
            &actor,
            CreateDistrictInput {
                name: "Distrito 1".to_owned(),
                department_id: department.id(),
            },
        )
        .await
    else {
        return;
    };
    let Ok(neighborhood) = service
        .create_neighborhood(&actor, neighborhood_input("San Roque", vec![district.id()]))
        .await
    else {
        return;
    };

    let result = service.delete_department(&actor, department.id()).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let result = service.delete_district(&actor, district.id()).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    store.requests.lock().await.push(SurveyRequest::open(
        neighborhood.id(),
        RequestKind::New,
        None,
        "",
        chrono::Utc::now(),
    ));
    let result = service.delete_neighborhood(&actor, neighborhood.id()).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    store.requests.lock().await.clear();
    assert!(service.delete_neighborhood(&actor, neighborhood.id()).await.is_ok());
    assert!(service.delete_district(&actor, district.id()).await.is_ok());
    assert!(service.delete_department(&actor, department.id()).await.is_ok());
}

#[tokio::test]
async fn district_requires_existing_department() {
    let store = Arc::new(FakeStore::default());
    let actor = manager(&store).await;
    let service = service(&store);

    let result = service
        .create_district(
            &actor,
            CreateDistrictInput {
                name: "Distrito 1".to_owned(),
                department_id: DepartmentId::new(),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn neighborhood_requires_existing_districts_and_keeps_code_on_update() {
    let store = Arc::new(FakeStore::default());
    let actor = manager(&store).await;
    let service = service(&store);

    let missing = service
        .create_neighborhood(&actor, neighborhood_input("San Roque", vec![DistrictId::new()]))
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let empty = service
        .create_neighborhood(&actor, neighborhood_input("San Roque", Vec::new()))
        .await;
    assert!(matches!(empty, Err(AppError::Validation(_))));

    let Ok(department) = service.create_department(&actor, "Central").await else {
        return;
    };
    let Ok(district) = service
        .create_district(
            &actor,
            CreateDistrictInput {
                name: "Distrito 1".to_owned(),
                department_id: department.id(),
            },
        )
        .await
    else {
        return;
    };
    let Ok(neighborhood) = service
        .create_neighborhood(&actor, neighborhood_input("San Roque", vec![district.id()]))
        .await
    else {
        return;
    };

    let mut input = neighborhood_input("San Roque Norte", vec![district.id()]);
    input.status = NeighborhoodStatus::Inactive;
    let updated = service
        .update_neighborhood(&actor, neighborhood.id(), input)
        .await;
    assert!(matches!(
        updated,
        Ok(ref row) if row.code() == neighborhood.code() && row.status() == NeighborhoodStatus::Inactive
    ));
}

#[tokio::test]
async fn neighborhood_listing_filters_by_name_status_and_district() {
    let store = Arc::new(FakeStore::default());
    let actor = manager(&store).await;
    let service = service(&store);

    let Ok(department) = service.create_department(&actor, "Central").await else {
        return;
    };
    let mut districts = Vec::new();
    for name in ["Distrito 1", "Distrito 2"] {
        if let Ok(district) = service
            .create_district(
                &actor,
                CreateDistrictInput {
                    name: name.to_owned(),
                    department_id: department.id(),
                },
            )
            .await
        {
            districts.push(district.id());
        }
    }
    assert_eq!(districts.len(), 2);

    for (name, district_ids) in [
        ("San Roque", vec![districts[0]]),
        ("Santa Ana", vec![districts[0], districts[1]]),
        ("Las Flores", vec![districts[1]]),
    ] {
        assert!(
            service
                .create_neighborhood(&actor, neighborhood_input(name, district_ids))
                .await
                .is_ok()
        );
    }

    let by_name = service
        .list_neighborhoods(NeighborhoodFilter {
            name_contains: Some("  san ".to_owned()),
            ..NeighborhoodFilter::default()
        })
        .await
        .unwrap_or_default();
    assert_eq!(by_name.len(), 2);

    let by_district = service
        .list_neighborhoods(NeighborhoodFilter {
            district_id: Some(districts[1]),
            ..NeighborhoodFilter::default()
        })
        .await
        .unwrap_or_default();
    assert_eq!(by_district.len(), 2);

    let inactive = service
        .list_neighborhoods(NeighborhoodFilter {
            status: Some(NeighborhoodStatus::Inactive),
            ..NeighborhoodFilter::default()
        })
        .await
        .unwrap_or_default();
    assert!(inactive.is_empty());
}
