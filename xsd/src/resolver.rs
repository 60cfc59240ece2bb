//! Reference resolution and flattening.
//!
//! Turns a [`RawSchema`] into a [`ResolvedSchema`]: qualified-name references
//! are chased to their declarations, groups and attribute groups are expanded
//! inline, anonymous types receive synthetic names, and every simple type is
//! reduced to its scalar representation. Resolution is fail-fast; on error no
//! partial schema escapes.

use std::collections::{HashMap, HashSet};

use crate::attribute::{AttributeDecl, AttributeUse};
use crate::builtins::{self, Primitive};
use crate::complex_type::{ComplexTypeDef, DerivationMethod};
use crate::element::ElementDecl;
use crate::error::{RefKind, ResolveError};
use crate::particle::{MaxOccurs, Occurs, Particle};
use crate::resolved::{
    ClassType, EnumType, ResolvedAttribute, ResolvedElement, ResolvedParticle, ResolvedSchema,
    ResolvedType, ResolvedTypeRef, SimpleRepr, SubstitutionMember,
};
use crate::schema::RawSchema;
use crate::shared::{Type, TypeRef};
use crate::simple_type::SimpleType;
use crate::xstypes::QName;

pub fn resolve(raw: &RawSchema) -> Result<ResolvedSchema, ResolveError> {
    Resolver::new(raw).run()
}

/// Allocates unique type names. Declared names are reserved up front;
/// synthetic names for anonymous types are derived from their enclosing
/// declaration and disambiguated with a numeric suffix in discovery order.
struct NameTable {
    used: HashSet<String>,
}

impl NameTable {
    fn new() -> Self {
        Self {
            used: HashSet::new(),
        }
    }

    fn reserve(&mut self, name: &str) {
        self.used.insert(name.to_string());
    }

    fn claim(&mut self, hint: &str) -> String {
        if self.used.insert(hint.to_string()) {
            return hint.to_string();
        }
        let mut n = 2u32;
        loop {
            let candidate = format!("{}{}", hint, n);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

struct Resolver<'a> {
    raw: &'a RawSchema,
    names: NameTable,
    out: ResolvedSchema,
    /// Head element name -> member element names, in declaration order.
    substitutions: HashMap<String, Vec<String>>,
    /// Top-level element name -> synthetic class name for its inline
    /// complex type. Pre-assigned so element references never recurse into
    /// class bodies.
    element_class: HashMap<String, String>,
    element_type_cache: HashMap<String, ResolvedTypeRef>,
    simple_cache: HashMap<String, SimpleRepr>,
    simple_stack: Vec<String>,
    group_stack: Vec<String>,
    attribute_group_stack: Vec<String>,
}

fn unresolved(kind: RefKind, name: &str, context: &str) -> ResolveError {
    ResolveError::UnresolvedReference {
        kind,
        name: name.to_string(),
        context: context.to_string(),
    }
}

fn builtin_repr(q: &QName, context: &str) -> Result<SimpleRepr, ResolveError> {
    let (primitive, is_list) =
        builtins::lookup(&q.local_name).ok_or_else(|| ResolveError::UnknownBuiltin {
            name: q.local_name.clone(),
            context: context.to_string(),
        })?;
    let repr = SimpleRepr::Primitive(primitive);
    Ok(if is_list {
        SimpleRepr::List(Box::new(repr))
    } else {
        repr
    })
}

/// Occurrence bounds of a particle reached through a group reference: both
/// bounds multiply.
fn combine_occurs(outer: Occurs, inner: Occurs) -> Occurs {
    if outer.is_void() || inner.is_void() {
        return Occurs {
            min: 0,
            max: MaxOccurs::Bounded(0),
        };
    }
    let max = match (outer.max, inner.max) {
        (MaxOccurs::Bounded(a), MaxOccurs::Bounded(b)) => MaxOccurs::Bounded(a.saturating_mul(b)),
        _ => MaxOccurs::Unbounded,
    };
    Occurs {
        min: outer.min.saturating_mul(inner.min),
        max,
    }
}

impl<'a> Resolver<'a> {
    fn new(raw: &'a RawSchema) -> Self {
        Self {
            raw,
            names: NameTable::new(),
            out: ResolvedSchema {
                target_namespace: raw.target_namespace.clone(),
                ..ResolvedSchema::default()
            },
            substitutions: HashMap::new(),
            element_class: HashMap::new(),
            element_type_cache: HashMap::new(),
            simple_cache: HashMap::new(),
            simple_stack: Vec::new(),
            group_stack: Vec::new(),
            attribute_group_stack: Vec::new(),
        }
    }

    fn run(mut self) -> Result<ResolvedSchema, ResolveError> {
        let raw = self.raw;
        for name in raw.types.keys() {
            self.names.reserve(name);
        }

        // Substitution membership is declared on the members; invert it onto
        // the heads before anything needs the member lists.
        for (name, element) in &raw.elements {
            if let Some(head) = &element.substitution_group {
                if !raw.elements.contains_key(&head.local_name) {
                    return Err(unresolved(RefKind::SubstitutionHead, &head.local_name, name));
                }
                self.substitutions
                    .entry(head.local_name.clone())
                    .or_default()
                    .push(name.clone());
            }
        }

        // Pre-assign class names to top-level elements with inline complex
        // types. Bodies are filled in the root pass; references only need
        // the name.
        for (name, element) in &raw.elements {
            if let Some(TypeRef::Inline(inline)) = &element.type_ {
                if matches!(**inline, Type::Complex(_)) {
                    let class_name = self.names.claim(name);
                    self.element_class.insert(name.clone(), class_name);
                }
            }
        }

        for (name, type_) in &raw.types {
            match type_ {
                Type::Simple(_) => {
                    // Forces enum registration and surfaces errors even for
                    // types nothing references.
                    self.simple_repr_of_named(name, name)?;
                }
                Type::Complex(def) => {
                    let class = self.resolve_complex(def, name)?;
                    self.out
                        .types
                        .insert(name.clone(), ResolvedType::Class(class));
                }
            }
        }

        for (name, element) in &raw.elements {
            if let Some(class_name) = self.element_class.get(name).cloned() {
                if let Some(TypeRef::Inline(inline)) = &element.type_ {
                    if let Type::Complex(def) = &**inline {
                        let class = self.resolve_complex(def, &class_name)?;
                        self.out
                            .types
                            .insert(class_name, ResolvedType::Class(class));
                    }
                }
            }
            let resolved = ResolvedElement {
                tag: name.clone(),
                type_: self.top_element_type(name, name)?,
                occurs: element.occurs,
                nillable: element.nillable,
                abstract_: element.abstract_,
                substitution: self.substitution_members(name)?,
            };
            self.out.roots.insert(name.clone(), resolved);
        }

        Ok(self.out)
    }

    /// Member list for a substitution group head: the head itself first
    /// (unless abstract), then the members in declaration order. Empty for
    /// elements that head no group.
    fn substitution_members(
        &mut self,
        head: &str,
    ) -> Result<Vec<SubstitutionMember>, ResolveError> {
        let Some(member_names) = self.substitutions.get(head).cloned() else {
            return Ok(Vec::new());
        };
        let raw = self.raw;
        let mut members = Vec::new();
        let head_decl = &raw.elements[head];
        if !head_decl.abstract_ {
            members.push(SubstitutionMember {
                tag: head.to_string(),
                type_: self.top_element_type(head, head)?,
            });
        }
        for name in member_names {
            members.push(SubstitutionMember {
                tag: name.clone(),
                type_: self.top_element_type(&name, head)?,
            });
        }
        Ok(members)
    }

    /// The resolved type of a top-level element, memoized. For elements with
    /// inline complex types this returns the pre-assigned class name without
    /// touching the body.
    fn top_element_type(
        &mut self,
        name: &str,
        context: &str,
    ) -> Result<ResolvedTypeRef, ResolveError> {
        if let Some(type_) = self.element_type_cache.get(name) {
            return Ok(type_.clone());
        }
        let raw = self.raw;
        let element = raw
            .elements
            .get(name)
            .ok_or_else(|| unresolved(RefKind::Element, name, context))?;
        let type_ = if let Some(class_name) = self.element_class.get(name) {
            ResolvedTypeRef::Class(class_name.clone())
        } else {
            match &element.type_ {
                None => {
                    return Err(ResolveError::ElementWithoutType {
                        name: name.to_string(),
                    })
                }
                Some(type_) => self.element_type_ref(type_, name, name)?,
            }
        };
        self.element_type_cache
            .insert(name.to_string(), type_.clone());
        Ok(type_)
    }

    /// Resolves an element's type reference. `hint` seeds synthetic names
    /// for anonymous types.
    fn element_type_ref(
        &mut self,
        type_: &TypeRef,
        hint: &str,
        context: &str,
    ) -> Result<ResolvedTypeRef, ResolveError> {
        let raw = self.raw;
        Ok(match type_ {
            TypeRef::Named(q) if q.is_builtin() => {
                ResolvedTypeRef::Simple(builtin_repr(q, context)?)
            }
            TypeRef::Named(q) => match raw.types.get(&q.local_name) {
                Some(Type::Complex(_)) => ResolvedTypeRef::Class(q.local_name.clone()),
                Some(Type::Simple(_)) => {
                    ResolvedTypeRef::Simple(self.simple_repr_of_named(&q.local_name, context)?)
                }
                None => return Err(unresolved(RefKind::Type, &q.local_name, context)),
            },
            TypeRef::Inline(inline) => match &**inline {
                Type::Simple(def) => {
                    ResolvedTypeRef::Simple(self.simple_repr_of_def(def, None, hint, context)?)
                }
                Type::Complex(def) => {
                    let class_name = self.names.claim(hint);
                    let class = self.resolve_complex(def, &class_name)?;
                    self.out
                        .types
                        .insert(class_name.clone(), ResolvedType::Class(class));
                    ResolvedTypeRef::Class(class_name)
                }
            },
        })
    }

    // --- simple types -----------------------------------------------------

    fn simple_repr_of_named(
        &mut self,
        name: &str,
        context: &str,
    ) -> Result<SimpleRepr, ResolveError> {
        if let Some(repr) = self.simple_cache.get(name) {
            return Ok(repr.clone());
        }
        let raw = self.raw;
        let type_ = raw
            .types
            .get(name)
            .ok_or_else(|| unresolved(RefKind::Type, name, context))?;
        let def = type_.as_simple().ok_or_else(|| ResolveError::NotASimpleType {
            name: name.to_string(),
            context: context.to_string(),
        })?;
        if let Some(start) = self.simple_stack.iter().position(|n| n == name) {
            let mut cycle = self.simple_stack[start..].to_vec();
            cycle.push(name.to_string());
            return Err(ResolveError::CyclicInheritance { cycle });
        }
        self.simple_stack.push(name.to_string());
        let repr = self.simple_repr_of_def(def, Some(name), name, name)?;
        self.simple_stack.pop();
        self.simple_cache.insert(name.to_string(), repr.clone());
        Ok(repr)
    }

    /// Reduces a simple type definition to its representation. A restriction
    /// with enumeration facets registers an enum type: under `declared_name`
    /// if the definition is named, otherwise under a synthetic name derived
    /// from `hint`.
    fn simple_repr_of_def(
        &mut self,
        def: &SimpleType,
        declared_name: Option<&str>,
        hint: &str,
        context: &str,
    ) -> Result<SimpleRepr, ResolveError> {
        match def {
            SimpleType::Restriction(r) => {
                if !r.enumeration.is_empty() {
                    let name = match declared_name {
                        Some(name) => name.to_string(),
                        None => self.names.claim(hint),
                    };
                    if !self.out.types.contains_key(&name) {
                        self.out.types.insert(
                            name.clone(),
                            ResolvedType::Enum(EnumType {
                                variants: r.enumeration.clone(),
                            }),
                        );
                    }
                    return Ok(SimpleRepr::Enum(name));
                }
                if r.base.is_builtin() {
                    builtin_repr(&r.base, context)
                } else {
                    self.simple_repr_of_named(&r.base.local_name, context)
                }
            }
            SimpleType::List { item } => {
                let item_repr = self.simple_repr_of_ref(item, hint, context)?;
                Ok(SimpleRepr::List(Box::new(item_repr)))
            }
            SimpleType::Union { members } => {
                // Unions collapse to strings; the lexical value is kept
                // as-is. A union of lists stays a list.
                let mut is_list = false;
                for member in members {
                    is_list |= self.simple_repr_of_ref(member, hint, context)?.is_list();
                }
                let string = SimpleRepr::Primitive(Primitive::String);
                Ok(if is_list {
                    SimpleRepr::List(Box::new(string))
                } else {
                    string
                })
            }
        }
    }

    fn simple_repr_of_ref(
        &mut self,
        type_: &TypeRef,
        hint: &str,
        context: &str,
    ) -> Result<SimpleRepr, ResolveError> {
        match type_ {
            TypeRef::Named(q) if q.is_builtin() => builtin_repr(q, context),
            TypeRef::Named(q) => self.simple_repr_of_named(&q.local_name, context),
            TypeRef::Inline(inline) => match &**inline {
                Type::Simple(def) => self.simple_repr_of_def(def, None, hint, context),
                Type::Complex(_) => Err(ResolveError::NotASimpleType {
                    name: hint.to_string(),
                    context: context.to_string(),
                }),
            },
        }
    }

    // --- complex types ----------------------------------------------------

    fn resolve_complex(
        &mut self,
        def: &ComplexTypeDef,
        class_name: &str,
    ) -> Result<ClassType, ResolveError> {
        let raw = self.raw;
        let mut base = None;
        let mut value = None;

        if let Some(derivation) = &def.base {
            self.check_base_cycle(class_name, &derivation.base)?;
            let base_name = &derivation.base.local_name;
            if derivation.base.is_builtin() {
                value = Some(builtin_repr(&derivation.base, class_name)?);
            } else {
                match raw.types.get(base_name) {
                    Some(Type::Simple(_)) => {
                        value = Some(self.simple_repr_of_named(base_name, class_name)?);
                    }
                    Some(Type::Complex(base_def)) => match derivation.method {
                        DerivationMethod::Extension => base = Some(base_name.clone()),
                        DerivationMethod::Restriction => {
                            self.check_restriction(def, base_name, class_name)?;
                            if def.simple_content {
                                value =
                                    Some(self.raw_simple_content_repr(base_def, class_name)?);
                            }
                        }
                    },
                    None => return Err(unresolved(RefKind::Type, base_name, class_name)),
                }
            }
        }

        let particles = match &def.content {
            Some(particle) => match self.resolve_particle(particle, class_name)? {
                Some(ResolvedParticle::Sequence { particles, occurs }) if occurs == Occurs::ONCE => {
                    particles
                }
                Some(particle) => vec![particle],
                None => Vec::new(),
            },
            None => Vec::new(),
        };

        let mut attributes = Vec::new();
        self.collect_attributes(
            &def.attributes,
            &def.attribute_groups,
            class_name,
            &mut attributes,
        )?;

        Ok(ClassType {
            base,
            particles,
            attributes,
            value,
        })
    }

    /// Walks the raw derivation chain starting at `base` and fails on the
    /// first repeated name. Run before any chain-following logic so that
    /// later walks terminate.
    fn check_base_cycle(&self, class_name: &str, base: &QName) -> Result<(), ResolveError> {
        let raw = self.raw;
        let mut path = vec![class_name.to_string()];
        let mut current = base.clone();
        loop {
            if current.is_builtin() {
                return Ok(());
            }
            if path.contains(&current.local_name) {
                path.push(current.local_name.clone());
                return Err(ResolveError::CyclicInheritance { cycle: path });
            }
            path.push(current.local_name.clone());
            match raw.types.get(&current.local_name) {
                Some(Type::Complex(def)) => match &def.base {
                    Some(derivation) => current = derivation.base.clone(),
                    None => return Ok(()),
                },
                // simple bases terminate the complex chain; their own
                // cycles are caught by the simple-type resolver
                Some(Type::Simple(_)) => return Ok(()),
                None => return Err(unresolved(RefKind::Type, &current.local_name, class_name)),
            }
        }
    }

    /// The text-value representation of a simple-content complex type,
    /// chased through its raw derivation chain. The chain is acyclic at this
    /// point.
    fn raw_simple_content_repr(
        &mut self,
        def: &ComplexTypeDef,
        context: &str,
    ) -> Result<SimpleRepr, ResolveError> {
        let raw = self.raw;
        let mut current = def;
        loop {
            let Some(derivation) = &current.base else {
                // simple content with no derivation carries an untyped value
                return Ok(SimpleRepr::Primitive(Primitive::String));
            };
            if derivation.base.is_builtin() {
                return builtin_repr(&derivation.base, context);
            }
            match raw.types.get(&derivation.base.local_name) {
                Some(Type::Simple(_)) => {
                    return self.simple_repr_of_named(&derivation.base.local_name, context)
                }
                Some(Type::Complex(base_def)) => current = base_def,
                None => {
                    return Err(unresolved(
                        RefKind::Type,
                        &derivation.base.local_name,
                        context,
                    ))
                }
            }
        }
    }

    /// A restriction may only re-declare elements its base chain already
    /// has. Anything new is a hard error.
    fn check_restriction(
        &mut self,
        def: &ComplexTypeDef,
        base_name: &str,
        class_name: &str,
    ) -> Result<(), ResolveError> {
        let raw = self.raw;
        let mut base_tags = HashSet::new();
        let mut current = base_name.to_string();
        loop {
            let Some(Type::Complex(base_def)) = raw.types.get(&current) else {
                break;
            };
            if let Some(content) = &base_def.content {
                self.collect_raw_tags(content, class_name, &mut base_tags)?;
            }
            match &base_def.base {
                Some(derivation) if !derivation.base.is_builtin() => {
                    current = derivation.base.local_name.clone();
                }
                _ => break,
            }
        }

        let mut own_tags = HashSet::new();
        if let Some(content) = &def.content {
            self.collect_raw_tags(content, class_name, &mut own_tags)?;
        }
        for tag in own_tags {
            if !base_tags.contains(&tag) {
                return Err(ResolveError::InvalidRestriction {
                    type_name: class_name.to_string(),
                    element: tag,
                });
            }
        }
        Ok(())
    }

    fn collect_raw_tags(
        &mut self,
        particle: &Particle,
        context: &str,
        tags: &mut HashSet<String>,
    ) -> Result<(), ResolveError> {
        let raw = self.raw;
        match particle {
            Particle::Element(element) => {
                tags.insert(element.tag_name().to_string());
            }
            Particle::GroupRef { ref_, .. } => {
                let group = raw
                    .groups
                    .get(&ref_.local_name)
                    .ok_or_else(|| unresolved(RefKind::Group, &ref_.local_name, context))?;
                self.enter_group(&ref_.local_name)?;
                self.collect_raw_tags(&group.particle, context, tags)?;
                self.group_stack.pop();
            }
            Particle::Sequence { particles, .. }
            | Particle::Choice { particles, .. }
            | Particle::All { particles, .. } => {
                for particle in particles {
                    self.collect_raw_tags(particle, context, tags)?;
                }
            }
        }
        Ok(())
    }

    // --- particles --------------------------------------------------------

    fn enter_group(&mut self, name: &str) -> Result<(), ResolveError> {
        if let Some(start) = self.group_stack.iter().position(|n| n == name) {
            let mut cycle = self.group_stack[start..].to_vec();
            cycle.push(name.to_string());
            return Err(ResolveError::CyclicGroupReference { cycle });
        }
        self.group_stack.push(name.to_string());
        Ok(())
    }

    /// Resolves one content-model particle. Group references are replaced by
    /// the referenced compositor with combined occurrence bounds. Returns
    /// `None` for particles that vanish (empty compositors).
    fn resolve_particle(
        &mut self,
        particle: &Particle,
        owner: &str,
    ) -> Result<Option<ResolvedParticle>, ResolveError> {
        let raw = self.raw;
        Ok(match particle {
            Particle::Element(element) => Some(ResolvedParticle::Element(
                self.resolve_element(element, owner)?,
            )),
            Particle::GroupRef { ref_, occurs } => {
                let group = raw
                    .groups
                    .get(&ref_.local_name)
                    .ok_or_else(|| unresolved(RefKind::Group, &ref_.local_name, owner))?;
                self.enter_group(&ref_.local_name)?;
                let resolved = self.resolve_particle(&group.particle, owner)?;
                self.group_stack.pop();
                resolved.map(|inner| reoccur(inner, *occurs))
            }
            Particle::Sequence { particles, occurs } => {
                let particles = self.resolve_particles(particles, owner)?;
                (!particles.is_empty()).then_some(ResolvedParticle::Sequence {
                    particles,
                    occurs: *occurs,
                })
            }
            Particle::Choice { particles, occurs } => {
                let particles = self.resolve_particles(particles, owner)?;
                (!particles.is_empty()).then_some(ResolvedParticle::Choice {
                    particles,
                    occurs: *occurs,
                })
            }
            Particle::All { particles, occurs } => {
                let particles = self.resolve_particles(particles, owner)?;
                (!particles.is_empty()).then_some(ResolvedParticle::All {
                    particles,
                    occurs: *occurs,
                })
            }
        })
    }

    fn resolve_particles(
        &mut self,
        particles: &[Particle],
        owner: &str,
    ) -> Result<Vec<ResolvedParticle>, ResolveError> {
        let mut resolved = Vec::new();
        for particle in particles {
            if let Some(particle) = self.resolve_particle(particle, owner)? {
                resolved.push(particle);
            }
        }
        Ok(resolved)
    }

    fn resolve_element(
        &mut self,
        element: &ElementDecl,
        owner: &str,
    ) -> Result<ResolvedElement, ResolveError> {
        let raw = self.raw;
        if let Some(ref_) = &element.ref_ {
            let target = raw
                .elements
                .get(&ref_.local_name)
                .ok_or_else(|| unresolved(RefKind::Element, &ref_.local_name, owner))?;
            return Ok(ResolvedElement {
                tag: ref_.local_name.clone(),
                type_: self.top_element_type(&ref_.local_name, owner)?,
                occurs: element.occurs,
                nillable: target.nillable,
                abstract_: target.abstract_,
                substitution: self.substitution_members(&ref_.local_name)?,
            });
        }

        let tag = element.tag_name().to_string();
        let type_ = match &element.type_ {
            None => return Err(ResolveError::ElementWithoutType { name: tag }),
            Some(type_) => self.element_type_ref(type_, &tag, owner)?,
        };
        Ok(ResolvedElement {
            tag,
            type_,
            occurs: element.occurs,
            nillable: element.nillable,
            abstract_: element.abstract_,
            substitution: Vec::new(),
        })
    }

    // --- attributes -------------------------------------------------------

    fn collect_attributes(
        &mut self,
        attributes: &[AttributeDecl],
        groups: &[QName],
        owner: &str,
        out: &mut Vec<ResolvedAttribute>,
    ) -> Result<(), ResolveError> {
        let raw = self.raw;
        for attribute in attributes {
            if let Some(resolved) = self.resolve_attribute(attribute, owner)? {
                out.push(resolved);
            }
        }
        for group_ref in groups {
            let group = raw
                .attribute_groups
                .get(&group_ref.local_name)
                .ok_or_else(|| {
                    unresolved(RefKind::AttributeGroup, &group_ref.local_name, owner)
                })?;
            let name = &group_ref.local_name;
            if let Some(start) = self.attribute_group_stack.iter().position(|n| n == name) {
                let mut cycle = self.attribute_group_stack[start..].to_vec();
                cycle.push(name.clone());
                return Err(ResolveError::CyclicGroupReference { cycle });
            }
            self.attribute_group_stack.push(name.clone());
            self.collect_attributes(&group.attributes, &group.attribute_groups, owner, out)?;
            self.attribute_group_stack.pop();
        }
        Ok(())
    }

    fn resolve_attribute(
        &mut self,
        attribute: &AttributeDecl,
        owner: &str,
    ) -> Result<Option<ResolvedAttribute>, ResolveError> {
        if attribute.use_ == AttributeUse::Prohibited {
            return Ok(None);
        }
        let raw = self.raw;
        let target = match &attribute.ref_ {
            Some(ref_) => Some(
                raw.attributes
                    .get(&ref_.local_name)
                    .ok_or_else(|| unresolved(RefKind::Attribute, &ref_.local_name, owner))?,
            ),
            None => None,
        };
        let xml_name = attribute.xml_name().to_string();
        let type_ = attribute
            .type_
            .as_ref()
            .or_else(|| target.and_then(|t| t.type_.as_ref()));
        let repr = match type_ {
            // untyped attributes hold their lexical value
            None => SimpleRepr::Primitive(Primitive::String),
            Some(type_) => self.simple_repr_of_ref(type_, &xml_name, owner)?,
        };
        let default = attribute
            .default_value()
            .or_else(|| target.and_then(|t| t.default_value()))
            .map(str::to_string);
        Ok(Some(ResolvedAttribute {
            xml_name,
            repr,
            required: attribute.use_ == AttributeUse::Required,
            default,
        }))
    }
}

/// Replaces the occurrence bounds of an expanded group body with the bounds
/// combined with the reference's own.
fn reoccur(particle: ResolvedParticle, outer: Occurs) -> ResolvedParticle {
    match particle {
        ResolvedParticle::Element(mut element) => {
            element.occurs = combine_occurs(outer, element.occurs);
            ResolvedParticle::Element(element)
        }
        ResolvedParticle::Sequence { particles, occurs } => ResolvedParticle::Sequence {
            particles,
            occurs: combine_occurs(outer, occurs),
        },
        ResolvedParticle::Choice { particles, occurs } => ResolvedParticle::Choice {
            particles,
            occurs: combine_occurs(outer, occurs),
        },
        ResolvedParticle::All { particles, occurs } => ResolvedParticle::All {
            particles,
            occurs: combine_occurs(outer, occurs),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_schema;

    fn resolved(text: &str) -> ResolvedSchema {
        let doc = roxmltree::Document::parse(text).unwrap();
        resolve(&read_schema(&doc).unwrap()).unwrap()
    }

    fn resolve_err(text: &str) -> ResolveError {
        let doc = roxmltree::Document::parse(text).unwrap();
        resolve(&read_schema(&doc).unwrap()).unwrap_err()
    }

    #[test]
    fn root_element_with_builtin_type() {
        let schema = resolved(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:element name="class" type="xs:string"/>
               </xs:schema>"#,
        );
        let root = &schema.roots["class"];
        assert_eq!(
            root.type_,
            ResolvedTypeRef::Simple(SimpleRepr::Primitive(Primitive::String))
        );
        assert!(schema.types.is_empty());
    }

    #[test]
    fn named_enum_registered_under_declared_name() {
        let schema = resolved(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:simpleType name="color">
                   <xs:restriction base="xs:string">
                     <xs:enumeration value="red"/>
                     <xs:enumeration value="blue"/>
                   </xs:restriction>
                 </xs:simpleType>
               </xs:schema>"#,
        );
        let color = schema.enum_("color").unwrap();
        assert_eq!(color.variants, vec!["red", "blue"]);
    }

    #[test]
    fn anonymous_inline_type_gets_element_name() {
        let schema = resolved(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:element name="config">
                   <xs:complexType>
                     <xs:sequence>
                       <xs:element name="entry" type="xs:string" maxOccurs="unbounded"/>
                     </xs:sequence>
                   </xs:complexType>
                 </xs:element>
               </xs:schema>"#,
        );
        assert_eq!(schema.roots["config"].type_, ResolvedTypeRef::Class("config".into()));
        let config = schema.class("config").unwrap();
        assert_eq!(config.particles.len(), 1);
    }

    #[test]
    fn anonymous_name_collision_gets_suffix() {
        let schema = resolved(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:complexType name="item">
                   <xs:sequence/>
                 </xs:complexType>
                 <xs:element name="item">
                   <xs:complexType>
                     <xs:sequence/>
                   </xs:complexType>
                 </xs:element>
               </xs:schema>"#,
        );
        assert_eq!(schema.roots["item"].type_, ResolvedTypeRef::Class("item2".into()));
        assert!(schema.class("item").is_some());
        assert!(schema.class("item2").is_some());
    }

    #[test]
    fn extension_appends_to_stacked_content() {
        let schema = resolved(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:complexType name="animal">
                   <xs:sequence>
                     <xs:element name="name" type="xs:string"/>
                   </xs:sequence>
                 </xs:complexType>
                 <xs:complexType name="dog">
                   <xs:complexContent>
                     <xs:extension base="animal">
                       <xs:sequence>
                         <xs:element name="breed" type="xs:string"/>
                       </xs:sequence>
                     </xs:extension>
                   </xs:complexContent>
                 </xs:complexType>
               </xs:schema>"#,
        );
        let dog = schema.class("dog").unwrap();
        assert_eq!(dog.base.as_deref(), Some("animal"));
        let (particles, _) = schema.stacked(dog);
        assert_eq!(particles.len(), 2);
    }

    #[test]
    fn cyclic_inheritance_is_detected() {
        let err = resolve_err(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:complexType name="a">
                   <xs:complexContent>
                     <xs:extension base="b"><xs:sequence/></xs:extension>
                   </xs:complexContent>
                 </xs:complexType>
                 <xs:complexType name="b">
                   <xs:complexContent>
                     <xs:extension base="a"><xs:sequence/></xs:extension>
                   </xs:complexContent>
                 </xs:complexType>
               </xs:schema>"#,
        );
        assert!(matches!(err, ResolveError::CyclicInheritance { .. }));
    }

    #[test]
    fn group_reference_expands_inline() {
        let schema = resolved(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:group name="pair">
                   <xs:sequence>
                     <xs:element name="key" type="xs:string"/>
                     <xs:element name="value" type="xs:string"/>
                   </xs:sequence>
                 </xs:group>
                 <xs:complexType name="entry">
                   <xs:sequence>
                     <xs:group ref="pair" maxOccurs="unbounded"/>
                   </xs:sequence>
                 </xs:complexType>
               </xs:schema>"#,
        );
        let entry = schema.class("entry").unwrap();
        let ResolvedParticle::Sequence { particles, occurs } = &entry.particles[0] else {
            panic!("expected the expanded group compositor");
        };
        assert_eq!(particles.len(), 2);
        assert_eq!(occurs.max, MaxOccurs::Unbounded);
    }

    #[test]
    fn cyclic_group_reference_is_detected() {
        let err = resolve_err(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:group name="g">
                   <xs:sequence>
                     <xs:group ref="g"/>
                   </xs:sequence>
                 </xs:group>
                 <xs:complexType name="t">
                   <xs:sequence>
                     <xs:group ref="g"/>
                   </xs:sequence>
                 </xs:complexType>
               </xs:schema>"#,
        );
        assert!(matches!(err, ResolveError::CyclicGroupReference { .. }));
    }

    #[test]
    fn huge_occurrence_bounds_saturate() {
        let schema = resolved(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:group name="items">
                   <xs:sequence minOccurs="4294967296" maxOccurs="4294967296">
                     <xs:element name="item" type="xs:string"/>
                   </xs:sequence>
                 </xs:group>
                 <xs:complexType name="bulk">
                   <xs:sequence>
                     <xs:group ref="items" minOccurs="4294967296" maxOccurs="4294967296"/>
                   </xs:sequence>
                 </xs:complexType>
               </xs:schema>"#,
        );
        let bulk = schema.class("bulk").unwrap();
        let occurs = bulk.particles[0].occurs();
        assert_eq!(occurs.min, u64::MAX);
        assert_eq!(occurs.max, MaxOccurs::Bounded(u64::MAX));
    }

    #[test]
    fn substitution_members_collected_on_head() {
        let schema = resolved(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:element name="shape" type="xs:string" abstract="true"/>
                 <xs:element name="circle" type="xs:string" substitutionGroup="shape"/>
                 <xs:element name="square" type="xs:string" substitutionGroup="shape"/>
               </xs:schema>"#,
        );
        let shape = &schema.roots["shape"];
        let tags: Vec<_> = shape.substitution.iter().map(|m| m.tag.as_str()).collect();
        // abstract head is not its own member
        assert_eq!(tags, vec!["circle", "square"]);
        assert!(schema.roots["circle"].substitution.is_empty());
    }

    #[test]
    fn concrete_head_is_its_own_first_member() {
        let schema = resolved(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:element name="shape" type="xs:string"/>
                 <xs:element name="circle" type="xs:string" substitutionGroup="shape"/>
               </xs:schema>"#,
        );
        let tags: Vec<_> = schema.roots["shape"]
            .substitution
            .iter()
            .map(|m| m.tag.as_str())
            .collect();
        assert_eq!(tags, vec!["shape", "circle"]);
    }

    #[test]
    fn unresolved_type_reference_fails() {
        let err = resolve_err(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:element name="x" type="missing"/>
               </xs:schema>"#,
        );
        assert!(matches!(
            err,
            ResolveError::UnresolvedReference {
                kind: RefKind::Type,
                ..
            }
        ));
    }

    #[test]
    fn restriction_must_narrow_base_content() {
        let err = resolve_err(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:complexType name="base">
                   <xs:sequence>
                     <xs:element name="a" type="xs:string"/>
                   </xs:sequence>
                 </xs:complexType>
                 <xs:complexType name="narrow">
                   <xs:complexContent>
                     <xs:restriction base="base">
                       <xs:sequence>
                         <xs:element name="b" type="xs:string"/>
                       </xs:sequence>
                     </xs:restriction>
                   </xs:complexContent>
                 </xs:complexType>
               </xs:schema>"#,
        );
        assert!(
            matches!(err, ResolveError::InvalidRestriction { ref element, .. } if element == "b")
        );
    }

    #[test]
    fn union_collapses_to_string() {
        let schema = resolved(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:simpleType name="mixed">
                   <xs:union memberTypes="xs:int xs:string"/>
                 </xs:simpleType>
                 <xs:element name="x" type="mixed"/>
               </xs:schema>"#,
        );
        assert_eq!(
            schema.roots["x"].type_,
            ResolvedTypeRef::Simple(SimpleRepr::Primitive(Primitive::String))
        );
    }

    #[test]
    fn simple_content_value_chased_through_chain() {
        let schema = resolved(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:complexType name="measured">
                   <xs:simpleContent>
                     <xs:extension base="xs:double">
                       <xs:attribute name="unit" type="xs:string" use="required"/>
                     </xs:extension>
                   </xs:simpleContent>
                 </xs:complexType>
                 <xs:complexType name="weight">
                   <xs:simpleContent>
                     <xs:extension base="measured">
                       <xs:attribute name="scale" type="xs:string"/>
                     </xs:extension>
                   </xs:simpleContent>
                 </xs:complexType>
               </xs:schema>"#,
        );
        let weight = schema.class("weight").unwrap();
        assert_eq!(
            schema.value_of(weight),
            Some(&SimpleRepr::Primitive(Primitive::Double))
        );
        let (_, attributes) = schema.stacked(weight);
        assert_eq!(attributes.len(), 2);
        assert!(attributes[0].required);
    }

    #[test]
    fn prohibited_attribute_is_dropped() {
        let schema = resolved(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:complexType name="t">
                   <xs:sequence/>
                   <xs:attribute name="keep" type="xs:string"/>
                   <xs:attribute name="drop" type="xs:string" use="prohibited"/>
                 </xs:complexType>
               </xs:schema>"#,
        );
        let t = schema.class("t").unwrap();
        assert_eq!(t.attributes.len(), 1);
        assert_eq!(t.attributes[0].xml_name, "keep");
    }

    #[test]
    fn attribute_group_expanded_with_cycle_detection() {
        let schema = resolved(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:attributeGroup name="common">
                   <xs:attribute name="id" type="xs:string" use="required"/>
                 </xs:attributeGroup>
                 <xs:complexType name="t">
                   <xs:sequence/>
                   <xs:attributeGroup ref="common"/>
                 </xs:complexType>
               </xs:schema>"#,
        );
        let t = schema.class("t").unwrap();
        assert_eq!(t.attributes[0].xml_name, "id");
        assert!(t.attributes[0].required);
    }
}
