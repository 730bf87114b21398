use super::*;
use crate::criteria::StringFilter;
use crate::database::test_helpers::setup_test_db;

async fn insert_company(db: &Database, name: &str) -> CompanyDto {
    db.create_company(&CompanyDto {
        id: None,
        name: name.to_string(),
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn test_create_and_get_company() {
    let db = setup_test_db().await;
    let created = insert_company(&db, "Apple Inc.").await;
    let id = created.id.unwrap();

    let fetched = db.get_company(id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
    assert!(db.company_exists(id).await.unwrap());
    assert!(!db.company_exists(id + 1).await.unwrap());
}

#[tokio::test]
async fn test_get_missing_company() {
    let db = setup_test_db().await;
    assert!(db.get_company(999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_company() {
    let db = setup_test_db().await;
    let mut company = insert_company(&db, "Thinking Machines").await;
    company.name = "RCA".to_string();

    let updated = db.update_company(&company).await.unwrap();
    assert_eq!(updated.name, "RCA");
    assert_eq!(
        db.get_company(company.id.unwrap()).await.unwrap().unwrap().name,
        "RCA"
    );
}

#[tokio::test]
async fn test_update_missing_company_fails() {
    let db = setup_test_db().await;
    let result = db
        .update_company(&CompanyDto {
            id: Some(42),
            name: "Nobody".to_string(),
        })
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_partial_update_company() {
    let db = setup_test_db().await;
    let company = insert_company(&db, "Netronics").await;
    let id = company.id.unwrap();

    let untouched = db
        .partial_update_company(&CompanyPatch {
            id: Some(id),
            name: None,
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.name, "Netronics");

    let renamed = db
        .partial_update_company(&CompanyPatch {
            id: Some(id),
            name: Some("Tandy".to_string()),
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.name, "Tandy");

    let missing = db
        .partial_update_company(&CompanyPatch {
            id: Some(id + 100),
            name: Some("Ghost".to_string()),
        })
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_delete_company() {
    let db = setup_test_db().await;
    let company = insert_company(&db, "Commodore").await;
    let id = company.id.unwrap();

    assert!(db.delete_company(id).await.unwrap());
    assert!(!db.delete_company(id).await.unwrap());
    assert!(db.get_company(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_companies_by_name() {
    let db = setup_test_db().await;
    insert_company(&db, "Apple Inc.").await;
    insert_company(&db, "Applied Micro").await;
    insert_company(&db, "IBM").await;

    let criteria = CompanyCriteria {
        name: Some(StringFilter::new().contains("appl")),
        ..Default::default()
    };
    // LIKE is case-insensitive for ASCII in SQLite
    let found = db.find_companies_by_criteria(&criteria).await.unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(db.count_companies_by_criteria(&criteria).await.unwrap(), 2);

    let criteria = CompanyCriteria {
        name: Some(StringFilter::new().equals("IBM")),
        ..Default::default()
    };
    let found = db.find_companies_by_criteria(&criteria).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "IBM");
}

#[tokio::test]
async fn test_find_companies_page_sorted() {
    let db = setup_test_db().await;
    for name in ["Delta", "Alpha", "Charlie", "Bravo"] {
        insert_company(&db, name).await;
    }

    let request =
        PageRequest::new(0, 3).sorted_by("name", crate::pagination::SortDirection::Asc);
    let page = db
        .find_companies_page(&CompanyCriteria::default(), &request)
        .await
        .unwrap();
    let names: Vec<_> = page.content.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Bravo", "Charlie"]);
    assert_eq!(page.total_elements, 4);
    assert_eq!(page.total_pages(), 2);

    let second = db
        .find_companies_page(&CompanyCriteria::default(), &PageRequest { page: 1, ..request })
        .await
        .unwrap();
    assert_eq!(second.content.len(), 1);
    assert_eq!(second.content[0].name, "Delta");
}
