use std::{collections::HashMap, sync::LazyLock};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::IntoEnumIterator;
use tracing::{debug, trace};

use crate::{Abi, AbiError, Primitive, Result, SerialBuffer};

/// Longest chain of `typedef`s followed while resolving a name.
pub const MAX_ALIAS_DEPTH: usize = 32;
/// Deepest value nesting (de)serialized before giving up.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Knobs for decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerOptions {
    /// Decode `bytes` as an array of numbers rather than a hex string.
    pub bytes_as_array: bool,
    /// Decode anyvar values of kinds that have a short form as the bare
    /// value rather than `{"type", "value"}`.
    pub anyvar_short_form: bool,
}

/// Per-call state threaded through a single (de)serialization.
#[derive(Debug, Clone, Default)]
pub struct SerializerState {
    pub options: SerializerOptions,
    /// Set once a trailing binary extension field was left out; no field may
    /// be written after that.
    pub skipped_binary_extension: bool,
    depth: usize,
}

impl SerializerState {
    pub const fn new(options: SerializerOptions) -> Self {
        Self {
            options,
            skipped_binary_extension: false,
            depth: 0,
        }
    }

    /// Runs `f` one nesting level deeper.
    pub(crate) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(AbiError::TooDeep(MAX_NESTING_DEPTH));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

/// Index of a type within its [`AbiTypes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub type_name: String,
    pub type_id: TypeId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructType {
    pub base: Option<TypeId>,
    pub fields: Vec<Field>,
}

/// Arms are named after their types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantType {
    pub arms: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Primitive(Primitive),
    /// `T[]`
    Array(TypeId),
    /// `T?`
    Optional(TypeId),
    /// `T$`, may be left out at the end of a struct
    Extension(TypeId),
    Struct(StructType),
    Variant(VariantType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    pub name: String,
    pub kind: TypeKind,
}

/// Every type an ABI can name, built-ins included.
///
/// Types live in an arena and refer to each other by [`TypeId`], so
/// recursive ABIs need no shared mutable state. Once built the set is
/// read-only and can be shared across threads.
#[derive(Debug, Clone)]
pub struct AbiTypes {
    types: Vec<Type>,
    by_name: HashMap<String, TypeId>,
}

static BUILTIN: LazyLock<AbiTypes> = LazyLock::new(AbiTypes::new_builtin);

impl AbiTypes {
    /// Primitives plus `extended_asset`.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    fn new_builtin() -> Self {
        let mut types = Self {
            types: Vec::new(),
            by_name: HashMap::new(),
        };
        for primitive in Primitive::iter() {
            types.insert(primitive.to_string(), TypeKind::Primitive(primitive));
        }
        let fields = [("quantity", Primitive::Asset), ("contract", Primitive::Name)]
            .map(|(name, primitive)| Field {
                name: name.to_string(),
                type_name: primitive.to_string(),
                type_id: types.builtin_id(primitive.name()),
            })
            .to_vec();
        types.insert(
            "extended_asset".to_string(),
            TypeKind::Struct(StructType { base: None, fields }),
        );
        types
    }

    fn builtin_id(&self, name: &str) -> TypeId {
        self.get(name)
            .unwrap_or_else(|| unreachable!("built-in type '{name}' is registered"))
    }

    pub fn from_abi(abi: &Abi) -> Result<Self> {
        Self::builtin().with_abi(abi)
    }

    /// Adds the types declared by `abi`, which take precedence over existing
    /// ones of the same name.
    ///
    /// Aliases, structs and variants are registered first and resolved
    /// afterwards, so declarations may refer to each other in any order.
    /// Every name used must resolve.
    pub fn with_abi(mut self, abi: &Abi) -> Result<Self> {
        let mut aliases = HashMap::with_capacity(abi.types.len());
        for def in &abi.types {
            self.by_name.remove(&def.new_type_name);
            aliases.insert(def.new_type_name.as_str(), def.type_name.as_str());
        }

        let mut structs = Vec::with_capacity(abi.structs.len());
        for def in &abi.structs {
            aliases.remove(def.name.as_str());
            let id = self.insert(def.name.clone(), TypeKind::Struct(StructType::default()));
            structs.push((id, def));
        }
        let mut variants = Vec::with_capacity(abi.variants.len());
        for def in &abi.variants {
            aliases.remove(def.name.as_str());
            let id = self.insert(def.name.clone(), TypeKind::Variant(VariantType::default()));
            variants.push((id, def));
        }

        let mut alias_names: Vec<_> = aliases.keys().copied().collect();
        alias_names.sort_unstable();
        for name in alias_names {
            let id = self.resolve_with(name, &aliases, 0)?;
            self.by_name.insert(name.to_string(), id);
        }

        for (id, def) in structs {
            let base = if def.base.is_empty() {
                None
            } else {
                let base = self.resolve_with(&def.base, &aliases, 0)?;
                if !matches!(self.types[base.0].kind, TypeKind::Struct(_)) {
                    return Err(AbiError::InvalidBase {
                        name: def.name.clone(),
                        base: def.base.clone(),
                    });
                }
                Some(base)
            };
            let fields = def
                .fields
                .iter()
                .map(|field| {
                    Ok(Field {
                        name: field.name.clone(),
                        type_name: field.type_name.clone(),
                        type_id: self.resolve_with(&field.type_name, &aliases, 0)?,
                    })
                })
                .collect::<Result<_>>()?;
            self.types[id.0].kind = TypeKind::Struct(StructType { base, fields });
        }

        for (id, def) in variants {
            let arms = def
                .types
                .iter()
                .map(|type_name| {
                    Ok(Field {
                        name: type_name.clone(),
                        type_name: type_name.clone(),
                        type_id: self.resolve_with(type_name, &aliases, 0)?,
                    })
                })
                .collect::<Result<_>>()?;
            self.types[id.0].kind = TypeKind::Variant(VariantType { arms });
        }

        debug!(
            version = %abi.version,
            aliases = abi.types.len(),
            structs = abi.structs.len(),
            variants = abi.variants.len(),
            total = self.types.len(),
            "resolved ABI types",
        );
        Ok(self)
    }

    fn insert(&mut self, name: String, kind: TypeKind) -> TypeId {
        let id = TypeId(self.types.len());
        self.types.push(Type {
            name: name.clone(),
            kind,
        });
        self.by_name.insert(name, id);
        id
    }

    fn resolve_with(
        &mut self,
        name: &str,
        aliases: &HashMap<&str, &str>,
        depth: usize,
    ) -> Result<TypeId> {
        if depth > MAX_ALIAS_DEPTH {
            return Err(AbiError::AliasTooDeep(name.to_string()));
        }
        if let Some(id) = self.get(name) {
            return Ok(id);
        }
        if let Some(target) = aliases.get(name) {
            return self.resolve_with(target, aliases, depth + 1);
        }

        let (inner, wrap): (_, fn(TypeId) -> TypeKind) =
            if let Some(inner) = name.strip_suffix("[]") {
                (inner, TypeKind::Array)
            } else if let Some(inner) = name.strip_suffix('?') {
                (inner, TypeKind::Optional)
            } else if let Some(inner) = name.strip_suffix('$') {
                (inner, TypeKind::Extension)
            } else {
                return Err(AbiError::UnknownType(name.to_string()));
            };
        let inner = self.resolve_with(inner, aliases, depth + 1)?;
        Ok(self.insert(name.to_string(), wrap(inner)))
    }

    /// Looks `name` up, creating `T[]`, `T?` and `T$` wrappers on demand.
    pub fn resolve(&mut self, name: &str) -> Result<TypeId> {
        self.resolve_with(name, &HashMap::new(), 0)
    }

    /// Looks `name` up without creating anything.
    pub fn get(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    pub fn lookup(&self, name: &str) -> Result<TypeId> {
        self.get(name)
            .ok_or_else(|| AbiError::UnknownType(name.to_string()))
    }

    /// # Panics
    ///
    /// When `id` comes from another [`AbiTypes`].
    pub fn get_type(&self, id: TypeId) -> &Type {
        &self.types[id.0]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn serialize(
        &self,
        id: TypeId,
        buffer: &mut SerialBuffer,
        value: &Value,
        state: &mut SerializerState,
        allow_extensions: bool,
    ) -> Result<()> {
        state.nested(|state| {
            let ty = self.get_type(id);
            match &ty.kind {
                TypeKind::Primitive(primitive) => primitive.serialize(buffer, value, state),
                TypeKind::Array(inner) => {
                    let items = value
                        .as_array()
                        .ok_or_else(|| AbiError::expected("array", value))?;
                    buffer.push_len(items.len())?;
                    items
                        .iter()
                        .try_for_each(|item| self.serialize(*inner, buffer, item, state, false))
                }
                TypeKind::Optional(inner) => {
                    if value.is_null() {
                        buffer.push_u8(0);
                        return Ok(());
                    }
                    buffer.push_u8(1);
                    self.serialize(*inner, buffer, value, state, allow_extensions)
                }
                TypeKind::Extension(inner) => {
                    self.serialize(*inner, buffer, value, state, allow_extensions)
                }
                TypeKind::Struct(def) => {
                    self.serialize_struct(&ty.name, def, buffer, value, state, allow_extensions)
                }
                TypeKind::Variant(def) => {
                    self.serialize_variant(&ty.name, def, buffer, value, state, allow_extensions)
                }
            }
        })
    }

    fn serialize_struct(
        &self,
        name: &str,
        def: &StructType,
        buffer: &mut SerialBuffer,
        value: &Value,
        state: &mut SerializerState,
        allow_extensions: bool,
    ) -> Result<()> {
        let object = value
            .as_object()
            .ok_or_else(|| AbiError::expected("object", value))?;
        if let Some(base) = def.base {
            self.serialize(base, buffer, value, state, allow_extensions)?;
        }
        let last = def.fields.len().saturating_sub(1);
        for (i, field) in def.fields.iter().enumerate() {
            match object.get(&field.name) {
                Some(_) if state.skipped_binary_extension => {
                    return Err(AbiError::UnexpectedField {
                        struct_name: name.to_string(),
                        field: field.name.clone(),
                    });
                }
                Some(field_value) => self.serialize(
                    field.type_id,
                    buffer,
                    field_value,
                    state,
                    allow_extensions && i == last,
                )?,
                None if allow_extensions && self.is_extension(field.type_id) => {
                    trace!(struct_name = name, field = %field.name, "skipping binary extension");
                    state.skipped_binary_extension = true;
                }
                None => {
                    return Err(AbiError::MissingField {
                        struct_name: name.to_string(),
                        field: field.name.clone(),
                        type_name: field.type_name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn serialize_variant(
        &self,
        name: &str,
        def: &VariantType,
        buffer: &mut SerialBuffer,
        value: &Value,
        state: &mut SerializerState,
        allow_extensions: bool,
    ) -> Result<()> {
        let Some([Value::String(arm_name), arm_value]) = value.as_array().map(Vec::as_slice) else {
            return Err(AbiError::expected("variant as [\"type\", value]", value));
        };
        let index = def
            .arms
            .iter()
            .position(|arm| arm.name == *arm_name)
            .ok_or_else(|| AbiError::UnknownVariantArm {
                variant: name.to_string(),
                arm: arm_name.clone(),
            })?;
        buffer.push_len(index)?;
        self.serialize(def.arms[index].type_id, buffer, arm_value, state, allow_extensions)
    }

    fn is_extension(&self, id: TypeId) -> bool {
        matches!(self.get_type(id).kind, TypeKind::Extension(_))
    }

    pub fn deserialize(
        &self,
        id: TypeId,
        buffer: &mut SerialBuffer,
        state: &mut SerializerState,
        allow_extensions: bool,
    ) -> Result<Value> {
        state.nested(|state| {
            let ty = self.get_type(id);
            match &ty.kind {
                TypeKind::Primitive(primitive) => primitive.deserialize(buffer, state),
                TypeKind::Array(inner) => {
                    let len = buffer.get_len()?;
                    // the count is untrusted, let the data prove it
                    let mut items = Vec::new();
                    for _ in 0..len {
                        items.push(self.deserialize(*inner, buffer, state, false)?);
                    }
                    Ok(Value::Array(items))
                }
                TypeKind::Optional(inner) => {
                    if buffer.get()? == 0 {
                        return Ok(Value::Null);
                    }
                    self.deserialize(*inner, buffer, state, allow_extensions)
                }
                TypeKind::Extension(inner) => {
                    self.deserialize(*inner, buffer, state, allow_extensions)
                }
                TypeKind::Struct(def) => {
                    let mut object = Map::new();
                    self.deserialize_struct(def, buffer, state, allow_extensions, &mut object)?;
                    Ok(Value::Object(object))
                }
                TypeKind::Variant(def) => {
                    let index = buffer.get_varuint32()?;
                    let arm = usize::try_from(index)
                        .ok()
                        .and_then(|i| def.arms.get(i))
                        .ok_or_else(|| AbiError::VariantIndexOutOfRange {
                            variant: ty.name.clone(),
                            index,
                        })?;
                    let value = self.deserialize(arm.type_id, buffer, state, allow_extensions)?;
                    Ok(Value::Array(vec![arm.name.clone().into(), value]))
                }
            }
        })
    }

    /// Base fields come first, in the same object.
    fn deserialize_struct(
        &self,
        def: &StructType,
        buffer: &mut SerialBuffer,
        state: &mut SerializerState,
        allow_extensions: bool,
        object: &mut Map<String, Value>,
    ) -> Result<()> {
        if let Some(base) = def.base {
            let base_type = self.get_type(base);
            let TypeKind::Struct(base_def) = &base_type.kind else {
                return Err(AbiError::UnknownType(base_type.name.clone()));
            };
            state.nested(|state| {
                self.deserialize_struct(base_def, buffer, state, allow_extensions, object)
            })?;
        }
        for field in &def.fields {
            if allow_extensions && self.is_extension(field.type_id) && !buffer.have_read_data() {
                state.skipped_binary_extension = true;
                continue;
            }
            let value = self.deserialize(field.type_id, buffer, state, allow_extensions)?;
            object.insert(field.name.clone(), value);
        }
        Ok(())
    }

    /// Runs `f` on the type called `type_name`. `T[]`, `T?` and `T$` names
    /// nobody resolved yet are built in a scratch copy, leaving `self`
    /// untouched; [`Self::resolve`] them once to skip the copy.
    fn with_type<T>(
        &self,
        type_name: &str,
        f: impl FnOnce(&Self, TypeId) -> Result<T>,
    ) -> Result<T> {
        if let Some(id) = self.get(type_name) {
            return f(self, id);
        }
        let mut scratch = self.clone();
        let id = scratch.resolve(type_name)?;
        trace!(type_name, "built type on demand");
        f(&scratch, id)
    }

    /// Serializes `value` as the type called `type_name`.
    pub fn serialize_value(&self, type_name: &str, value: &Value) -> Result<Vec<u8>> {
        self.with_type(type_name, |types, id| {
            let mut buffer = SerialBuffer::new();
            types.serialize(id, &mut buffer, value, &mut SerializerState::default(), true)?;
            Ok(buffer.into_vec())
        })
    }

    pub fn deserialize_value(
        &self,
        type_name: &str,
        data: &[u8],
        options: SerializerOptions,
    ) -> Result<Value> {
        self.with_type(type_name, |types, id| {
            let mut buffer = SerialBuffer::from_bytes(data);
            types.deserialize(id, &mut buffer, &mut SerializerState::new(options), true)
        })
    }
}
