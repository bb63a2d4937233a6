//! 배치 변환 속성 테스트
//!
//! - 어노테이션이 없는 문서는 변환 전후가 같다
//! - 대상 문서는 컨테이너가 정확히 하나 늘고, 0번은 사이드카, 나머지는 원래 순서
//! - 출력 순서는 입력 순서와 같다

use proptest::prelude::*;

use sqlproxy_core::node::{ManifestNode, Mapping};
use sqlproxy_injector::{ProxyConfig, SidecarInjector, TRIGGER_ANNOTATION, build_sidecar};

fn config() -> ProxyConfig {
    ProxyConfig::new("gcr.io/cloud-sql-connectors/cloud-sql-proxy", "2.0.0", "p:r:i=tcp:5432")
}

fn container(name: &str) -> ManifestNode {
    let mut m = Mapping::new();
    m.insert("name", ManifestNode::string(name));
    m.insert("image", ManifestNode::string(format!("{name}:latest")));
    m.into()
}

/// Deployment 문서를 만듭니다. `annotations`에 트리거 키 포함 여부를 지정합니다.
fn deployment(name: &str, containers: &[String], annotated: bool, extra: &[String]) -> ManifestNode {
    let mut annotations = Mapping::new();
    for key in extra {
        annotations.insert(key.clone(), ManifestNode::string("v"));
    }
    if annotated {
        annotations.insert(TRIGGER_ANNOTATION, ManifestNode::string("true"));
    }

    let mut metadata = Mapping::new();
    metadata.insert("name", ManifestNode::string(name));
    metadata.insert("annotations", annotations.into());

    let mut pod_spec = Mapping::new();
    pod_spec.insert(
        "containers",
        ManifestNode::Sequence(containers.iter().map(|c| container(c)).collect()),
    );
    let mut template = Mapping::new();
    template.insert("spec", pod_spec.into());
    let mut spec = Mapping::new();
    spec.insert("template", template.into());

    let mut doc = Mapping::new();
    doc.insert("apiVersion", ManifestNode::string("apps/v1"));
    doc.insert("kind", ManifestNode::string("Deployment"));
    doc.insert("metadata", metadata.into());
    doc.insert("spec", spec.into());
    doc.into()
}

const CONTAINERS: [&str; 4] = ["spec", "template", "spec", "containers"];

fn names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z][a-z0-9-]{0,12}", 0..6)
}

fn other_annotations() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,8}\\.example\\.com/[a-z]{1,8}", 0..3)
}

proptest! {
    #[test]
    fn unannotated_documents_are_unchanged(
        containers in names(),
        extra in other_annotations(),
    ) {
        let doc = deployment("app", &containers, false, &extra);
        let out = SidecarInjector::new(config()).transform(vec![doc.clone()]).unwrap();
        prop_assert_eq!(&out[0], &doc);
    }

    #[test]
    fn annotated_documents_gain_exactly_one_sidecar(
        containers in names(),
        extra in other_annotations(),
    ) {
        let doc = deployment("app", &containers, true, &extra);
        let original = doc.sequence_at(&CONTAINERS).unwrap().clone();

        let out = SidecarInjector::new(config()).transform(vec![doc]).unwrap();
        let updated = out[0].sequence_at(&CONTAINERS).unwrap();

        prop_assert_eq!(updated.len(), original.len() + 1);
        prop_assert_eq!(&updated[0], &build_sidecar(&config(), "Deployment").unwrap());
        prop_assert_eq!(&updated[1..], original.as_slice());
    }

    #[test]
    fn batch_order_is_preserved(flags in prop::collection::vec(any::<bool>(), 0..8)) {
        let docs: Vec<_> = flags
            .iter()
            .enumerate()
            .map(|(i, annotated)| deployment(&format!("app-{i}"), &["main".to_owned()], *annotated, &[]))
            .collect();

        let out = SidecarInjector::new(config()).transform(docs).unwrap();
        prop_assert_eq!(out.len(), flags.len());
        for (i, (doc, annotated)) in out.iter().zip(&flags).enumerate() {
            let expected_name = format!("app-{i}");
            prop_assert_eq!(
                doc.lookup(&["metadata", "name"]).unwrap().as_str(),
                Some(expected_name.as_str())
            );
            let expected_len = if *annotated { 2 } else { 1 };
            prop_assert_eq!(doc.sequence_at(&CONTAINERS).unwrap().len(), expected_len);
        }
    }
}
