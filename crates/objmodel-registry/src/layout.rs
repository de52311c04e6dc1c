//! Object layout - size, alignment and member offsets of class instances.
//!
//! ## Rules
//!
//! - A polymorphic class whose base carries no vtable pointer gets one at
//!   offset 0. Otherwise it reuses the base's.
//! - The base subobject comes first (after a newly introduced vtable
//!   pointer). An empty base takes no storage when the empty base
//!   optimization is on.
//! - Fields follow in declaration order, each aligned to its natural
//!   alignment. References and pointers are pointer-sized.
//! - The size is rounded up to the class alignment. An empty class has
//!   size 1 so that distinct objects have distinct addresses.
//! - Static members take no space.
//!
//! ## Example
//!
//! ```text
//! class A { virtual int get(); };   // [vptr]          size 8
//! class C : A { virtual int get(); }; // [vptr]        size 8
//! class B : C { virtual int get(); }; // [vptr]        size 8
//! class P { int x; int y; };        // [x][y]          size 8
//! class V : P { virtual void f(); }; // [vptr][x][y]   size 16
//! ```

use rustc_hash::{FxHashMap, FxHashSet};

use objmodel_core::{
    ClassEntry, CompilationError, DataType, ModelConfig, PrimitiveKind, Span, TargetLayout,
    TypeHash,
};

use crate::SymbolRegistry;

fn align_to(value: u64, align: u64) -> u64 {
    if align <= 1 {
        value
    } else {
        value.div_ceil(align) * align
    }
}

/// Placement of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    /// Field name.
    pub name: String,
    /// Offset from the start of the object.
    pub offset: u64,
    /// Size in bytes.
    pub size: u64,
    /// Alignment in bytes.
    pub align: u64,
}

/// Layout of a class instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLayout {
    /// The class laid out.
    pub class: TypeHash,
    /// `sizeof`.
    pub size: u64,
    /// `alignof`.
    pub align: u64,
    /// Bytes actually holding data (vptr, base, fields), before padding.
    pub data_size: u64,
    /// Offset of the vtable pointer, if the object has one.
    pub vptr_offset: Option<u64>,
    /// Offset of the base subobject, if the class has a base.
    pub base_offset: Option<u64>,
    /// Fields declared in this class.
    pub fields: Vec<FieldLayout>,
}

impl ObjectLayout {
    /// Whether objects carry a vtable pointer.
    pub fn has_vptr(&self) -> bool {
        self.vptr_offset.is_some()
    }

    /// Whether the class holds no data at all.
    pub fn is_empty(&self) -> bool {
        self.data_size == 0
    }

    /// Placement of a field declared in this class.
    pub fn field(&self, name: &str) -> Option<&FieldLayout> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Computes and caches class layouts for one target.
pub struct LayoutCalculator<'a> {
    registry: &'a SymbolRegistry,
    target: TargetLayout,
    empty_base_optimization: bool,
    cache: FxHashMap<TypeHash, ObjectLayout>,
    in_progress: FxHashSet<TypeHash>,
}

impl<'a> LayoutCalculator<'a> {
    /// Create a calculator using the layout options of `config`.
    pub fn new(registry: &'a SymbolRegistry, config: &ModelConfig) -> Self {
        Self {
            registry,
            target: config.target,
            empty_base_optimization: config.empty_base_optimization,
            cache: FxHashMap::default(),
            in_progress: FxHashSet::default(),
        }
    }

    /// Size and alignment of a value of type `data_type`.
    pub fn size_and_align(&mut self, data_type: &DataType) -> Result<(u64, u64), CompilationError> {
        if data_type.is_pointer || data_type.is_reference() {
            return Ok((self.target.pointer_size, self.target.pointer_align));
        }
        match PrimitiveKind::from_hash(data_type.type_hash) {
            Some(PrimitiveKind::Void) => Err(CompilationError::IncompleteType {
                name: "void".to_string(),
                span: Span::default(),
            }),
            Some(kind) => Ok((kind.size(), kind.align())),
            None => {
                let layout = self.layout(data_type.type_hash)?;
                Ok((layout.size, layout.align))
            }
        }
    }

    /// Layout of a class.
    pub fn layout(&mut self, class_hash: TypeHash) -> Result<ObjectLayout, CompilationError> {
        if let Some(layout) = self.cache.get(&class_hash) {
            return Ok(layout.clone());
        }
        let registry = self.registry;
        let class = registry
            .get_class(class_hash)
            .ok_or_else(|| CompilationError::UnknownType {
                name: registry.type_name(class_hash),
                span: Span::default(),
            })?;
        if !self.in_progress.insert(class_hash) {
            return Err(CompilationError::IncompleteType {
                name: class.name.clone(),
                span: Span::default(),
            });
        }
        let result = self.compute(class);
        self.in_progress.remove(&class_hash);

        let layout = result?;
        tracing::trace!(class = %class.name, size = layout.size, align = layout.align, "computed layout");
        self.cache.insert(class_hash, layout.clone());
        Ok(layout)
    }

    fn compute(&mut self, class: &ClassEntry) -> Result<ObjectLayout, CompilationError> {
        let base_layout = match class.base_class {
            Some(base) => Some(self.layout(base)?),
            None => None,
        };

        let mut offset = 0;
        let mut align = 1;
        let mut vptr_offset = None;
        let mut base_offset = None;

        let base_has_vptr = base_layout.as_ref().is_some_and(ObjectLayout::has_vptr);
        if class.is_polymorphic() && !base_has_vptr {
            vptr_offset = Some(0);
            offset = self.target.pointer_size;
            align = self.target.pointer_align;
        }

        if let Some(base) = &base_layout {
            let at = if self.empty_base_optimization && base.is_empty() {
                0
            } else {
                let at = align_to(offset, base.align);
                offset = at + base.size;
                at
            };
            base_offset = Some(at);
            if let Some(base_vptr) = base.vptr_offset {
                vptr_offset = Some(at + base_vptr);
            }
            align = align.max(base.align);
        }

        let mut fields = Vec::with_capacity(class.fields.len());
        for field in &class.fields {
            let (size, field_align) = self.size_and_align(&field.data_type)?;
            offset = align_to(offset, field_align);
            fields.push(FieldLayout {
                name: field.name.clone(),
                offset,
                size,
                align: field_align,
            });
            offset += size;
            align = align.max(field_align);
        }

        Ok(ObjectLayout {
            class: class.type_hash,
            size: align_to(offset, align).max(1),
            align,
            data_size: offset,
            vptr_offset,
            base_offset,
            fields,
        })
    }
}

/// Compute the layout of one class.
pub fn compute_layout(
    registry: &SymbolRegistry,
    class: TypeHash,
    config: &ModelConfig,
) -> Result<ObjectLayout, CompilationError> {
    LayoutCalculator::new(registry, config).layout(class)
}
