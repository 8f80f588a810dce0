//! Stored document shapes and enum wire names.

use smartcon_domain::{
    Company, CompanyType, MasterRecord, SalaryModel, Team, TeamType, Worker, WorkerStatus,
};

#[test]
fn worker_document_uses_korean_enum_labels() {
    let json = serde_json::json!({
        "id": "w1",
        "name": "김철수",
        "id_number": "800101-1234567",
        "team": {"id": "t1", "name": "본팀A"},
        "salary_model": "일급제",
        "unit_price": 150000,
        "status": "미배정",
        "created_at": 1,
        "updated_at": 1
    });
    let worker: Worker = serde_json::from_value(json).unwrap();
    assert_eq!(worker.salary_model, SalaryModel::Daily);
    assert_eq!(worker.status, WorkerStatus::Unassigned);
    assert_eq!(worker.team_id(), Some("t1"));
    assert!(worker.site.is_none());
    assert_eq!(Worker::COLLECTION, "workers");
}

#[test]
fn team_type_serializes_as_label() {
    let team = Team {
        id: "t1".into(),
        name: "협력 팀".into(),
        team_type: TeamType::Support,
        company: None,
        leader: None,
        members: vec![],
        status: Default::default(),
        created_at: 0,
        updated_at: 0,
    };
    let value = serde_json::to_value(&team).unwrap();
    assert_eq!(value["team_type"], "지원팀");
    assert_eq!(value["status"], "active");
}

#[test]
fn company_defaults_for_sparse_documents() {
    let company: Company = serde_json::from_str(
        r#"{"id":"c1","name":"청연","created_at":0,"updated_at":0}"#,
    )
    .unwrap();
    assert_eq!(company.company_type, CompanyType::Unspecified);
    assert_eq!(company.to_ref().name, "청연");
}

#[test]
fn enum_parse_matches_serde_names() {
    for ty in TeamType::ALL {
        let via_serde: TeamType = serde_json::from_value(serde_json::json!(ty.as_str())).unwrap();
        assert_eq!(via_serde, *ty);
    }
    for model in SalaryModel::ALL {
        assert_eq!(model.as_str().parse::<SalaryModel>().unwrap(), *model);
    }
}

mod alias_in_scope {
    use smartcon_domain::{impl_wire_name_conversions, Result, SmartconError};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Shift {
        Day,
        Night,
    }

    impl_wire_name_conversions!(Shift {
        Day => "주간",
        Night => "야간",
    });

    fn shift(label: &str) -> Result<Shift> {
        label.parse().map_err(SmartconError::InvalidInput)
    }

    #[test]
    fn wire_names_parse_next_to_the_crate_result_alias() {
        assert_eq!(shift("야간"), Ok(Shift::Night));
        assert!(matches!(shift("오후"), Err(SmartconError::InvalidInput(msg)) if msg.contains("오후")));
    }
}
