//! 매니페스트 노드 트리: 파싱된 설정 문서의 타입 표현
//!
//! [`ManifestNode`]는 YAML 문서를 `Scalar` / `Sequence` / `Mapping` 세 가지 형태로
//! 표현합니다. 매핑은 키 삽입 순서를 보존하므로 재직렬화 시 원래 순서가 유지됩니다.
//!
//! 타입 접근자(`lookup`, `sequence_at_mut` 등)는 기대한 형태가 아닐 때 조용히 변환하지 않고
//! [`ShapeError`]로 실패합니다.
//!
//! # 사용 예시
//! ```
//! use sqlproxy_core::node::ManifestNode;
//!
//! let doc = ManifestNode::from_yaml_str("spec:\n  containers: []\n").unwrap();
//! let containers = doc.lookup(&["spec", "containers"]).unwrap();
//! assert!(containers.as_sequence().is_some());
//! ```

use std::fmt;

use serde::de::{self, EnumAccess, Error as _, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{NodeError, ShapeError};

/// 노드 형태 구분자 (에러 메시지용)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Scalar,
    Sequence,
    Mapping,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.write_str("scalar"),
            Self::Sequence => f.write_str("sequence"),
            Self::Mapping => f.write_str("mapping"),
        }
    }
}

/// 스칼라 값
///
/// YAML 타입을 그대로 보존합니다. `true`는 문자열이 아닌 불리언으로 재출력됩니다.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(serde_yaml::Number),
    /// u64 범위를 넘는 양의 정수
    WideUnsigned(u128),
    /// i64 범위를 넘는 음의 정수
    WideSigned(i128),
    String(String),
}

impl Scalar {
    /// 문자열 스칼라인 경우 값을 반환합니다.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::WideUnsigned(n) => write!(f, "{n}"),
            Self::WideSigned(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl PartialEq<str> for Scalar {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// 매니페스트 노드
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestNode {
    Scalar(Scalar),
    Sequence(Vec<ManifestNode>),
    Mapping(Mapping),
}

impl ManifestNode {
    /// 문자열 스칼라 노드를 생성합니다.
    pub fn string(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::String(value.into()))
    }

    /// 불리언 스칼라 노드를 생성합니다.
    pub fn bool(value: bool) -> Self {
        Self::Scalar(Scalar::Bool(value))
    }

    /// 문자열 스칼라들의 시퀀스 노드를 생성합니다.
    pub fn string_list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Sequence(values.into_iter().map(Self::string).collect())
    }

    /// YAML(또는 JSON) 문자열 하나를 노드로 파싱합니다.
    pub fn from_yaml_str(input: &str) -> Result<Self, NodeError> {
        serde_yaml::from_str(input).map_err(|e| NodeError::Parse {
            reason: e.to_string(),
        })
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Scalar(_) => NodeKind::Scalar,
            Self::Sequence(_) => NodeKind::Sequence,
            Self::Mapping(_) => NodeKind::Mapping,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::Null))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(scalar) => scalar.as_str(),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Vec<ManifestNode>> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<ManifestNode>> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// 루트에서 필드 이름 경로를 따라 내려갑니다.
    ///
    /// 중간 노드가 매핑이 아니면 [`ShapeError::Mismatch`],
    /// 키가 없으면 [`ShapeError::Missing`]을 반환합니다.
    pub fn lookup<S: AsRef<str>>(&self, segments: &[S]) -> Result<&ManifestNode, ShapeError> {
        let mut current = self;
        for (depth, segment) in segments.iter().enumerate() {
            let mapping = match current {
                Self::Mapping(m) => m,
                other => {
                    return Err(ShapeError::Mismatch {
                        path: join_path(&segments[..depth]),
                        expected: NodeKind::Mapping,
                        found: other.kind(),
                    });
                }
            };
            current = mapping
                .get(segment.as_ref())
                .ok_or_else(|| ShapeError::Missing {
                    path: join_path(&segments[..=depth]),
                })?;
        }
        Ok(current)
    }

    /// [`lookup`](Self::lookup)의 가변 참조 버전
    pub fn lookup_mut<S: AsRef<str>>(
        &mut self,
        segments: &[S],
    ) -> Result<&mut ManifestNode, ShapeError> {
        let mut current = self;
        for (depth, segment) in segments.iter().enumerate() {
            let found = current.kind();
            let mapping = match current {
                Self::Mapping(m) => m,
                _ => {
                    return Err(ShapeError::Mismatch {
                        path: join_path(&segments[..depth]),
                        expected: NodeKind::Mapping,
                        found,
                    });
                }
            };
            current = mapping
                .get_mut(segment.as_ref())
                .ok_or_else(|| ShapeError::Missing {
                    path: join_path(&segments[..=depth]),
                })?;
        }
        Ok(current)
    }

    /// 경로 끝의 노드가 시퀀스인 경우 그 참조를 반환합니다.
    pub fn sequence_at<S: AsRef<str>>(
        &self,
        segments: &[S],
    ) -> Result<&Vec<ManifestNode>, ShapeError> {
        let node = self.lookup(segments)?;
        node.as_sequence().ok_or_else(|| ShapeError::Mismatch {
            path: join_path(segments),
            expected: NodeKind::Sequence,
            found: node.kind(),
        })
    }

    /// 경로 끝의 노드가 시퀀스인 경우 그 가변 참조를 반환합니다.
    pub fn sequence_at_mut<S: AsRef<str>>(
        &mut self,
        segments: &[S],
    ) -> Result<&mut Vec<ManifestNode>, ShapeError> {
        let node = self.lookup_mut(segments)?;
        let found = node.kind();
        node.as_sequence_mut().ok_or_else(|| ShapeError::Mismatch {
            path: join_path(segments),
            expected: NodeKind::Sequence,
            found,
        })
    }
}

impl From<Mapping> for ManifestNode {
    fn from(mapping: Mapping) -> Self {
        Self::Mapping(mapping)
    }
}

/// 순서를 보존하는 매핑
///
/// 키는 유일하며, 기존 키에 대한 [`insert`](Mapping::insert)는 위치를 유지한 채 값만 교체합니다.
/// 키는 타입을 가진 스칼라입니다. `1: one`의 키는 문자열 `"1"`이 아닌 정수로 남고,
/// `&str`로 찾는 접근자는 문자열 키만 일치시킵니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(Scalar, ManifestNode)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    fn position_of(&self, key: &Scalar) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&ManifestNode> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ManifestNode> {
        self.entries
            .iter_mut()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    /// 키-값을 설정합니다. 기존 값이 있으면 같은 위치에서 교체하고 이전 값을 반환합니다.
    pub fn insert(&mut self, key: impl Into<Scalar>, value: ManifestNode) -> Option<ManifestNode> {
        let key = key.into();
        match self.position_of(&key) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// 키가 없으면 빈 매핑을 만들고, 그 매핑으로 내려갑니다.
    ///
    /// 키가 이미 매핑이 아닌 값을 가지고 있으면 [`ShapeError::Mismatch`]를 반환합니다.
    pub fn get_or_insert_mapping(&mut self, key: &str) -> Result<&mut Mapping, ShapeError> {
        let idx = match self.position(key) {
            Some(idx) => idx,
            None => {
                self.entries
                    .push((Scalar::from(key), ManifestNode::Mapping(Mapping::new())));
                self.entries.len() - 1
            }
        };
        let node = &mut self.entries[idx].1;
        let found = node.kind();
        node.as_mapping_mut().ok_or_else(|| ShapeError::Mismatch {
            path: key.to_owned(),
            expected: NodeKind::Mapping,
            found,
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &Scalar> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Scalar, &ManifestNode)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

/// 세그먼트를 `.`으로 이어 붙인 경로 문자열. 빈 경로는 `<root>`
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    if segments.is_empty() {
        return "<root>".to_owned();
    }
    segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<&str>>()
        .join(".")
}

// --- serde ---

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::WideUnsigned(n) => serializer.serialize_u128(*n),
            Self::WideSigned(n) => serializer.serialize_i128(*n),
            Self::String(s) => serializer.serialize_str(s),
        }
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for ManifestNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(scalar) => scalar.serialize(serializer),
            Self::Sequence(items) => serializer.collect_seq(items),
            Self::Mapping(mapping) => mapping.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ManifestNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = ManifestNode;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a YAML scalar, sequence or mapping")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(ManifestNode::bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ManifestNode::Scalar(Scalar::Number(v.into())))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(ManifestNode::Scalar(Scalar::Number(v.into())))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Self::Value, E> {
        Ok(ManifestNode::Scalar(match i64::try_from(v) {
            Ok(small) => Scalar::Number(small.into()),
            Err(_) => Scalar::WideSigned(v),
        }))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
        Ok(ManifestNode::Scalar(match u64::try_from(v) {
            Ok(small) => Scalar::Number(small.into()),
            Err(_) => Scalar::WideUnsigned(v),
        }))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(ManifestNode::Scalar(Scalar::Number(v.into())))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(ManifestNode::string(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(ManifestNode::string(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ManifestNode::Scalar(Scalar::Null))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ManifestNode::Scalar(Scalar::Null))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        ManifestNode::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(ManifestNode::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut mapping = Mapping::new();
        while let Some(key) = map.next_key::<ManifestNode>()? {
            let key = match key {
                ManifestNode::Scalar(scalar) => scalar,
                other => {
                    return Err(A::Error::custom(NodeError::NonScalarKey {
                        found: other.kind(),
                    }));
                }
            };
            if mapping.position_of(&key).is_some() {
                return Err(A::Error::custom(NodeError::DuplicateKey {
                    key: key.to_string(),
                }));
            }
            let value = map.next_value()?;
            mapping.entries.push((key, value));
        }
        Ok(ManifestNode::Mapping(mapping))
    }

    /// serde_yaml은 사용자 정의 태그(`!custom`)를 enum으로 전달합니다.
    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Self::Value, A::Error> {
        let (tag, _) = data.variant::<String>()?;
        Err(A::Error::custom(NodeError::UnsupportedTag { tag }))
    }
}

impl<K: Into<Scalar>> FromIterator<(K, ManifestNode)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, ManifestNode)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (key, value) in iter {
            mapping.insert(key, value);
        }
        mapping
    }
}
