use crate::ast::{Constant, DeBruijn, DefaultFunction, Term};
use cardano_crypto::key::bls12_381::{G1Element, G2Element, MlResult};
use std::rc::Rc;

/// A persistent environment: index 0 is the most recently bound value.
#[derive(Debug, Clone, Default)]
pub enum Env {
    #[default]
    Empty,
    Cons(Rc<Value>, Rc<Env>),
}

impl Env {
    pub fn extend(self: &Rc<Self>, value: Value) -> Rc<Env> {
        Rc::new(Env::Cons(Rc::new(value), self.clone()))
    }

    pub fn lookup(&self, index: usize) -> Option<Rc<Value>> {
        let mut env = self;
        let mut remaining = index;
        loop {
            match env {
                Env::Empty => return None,
                Env::Cons(v, rest) => {
                    if remaining == 0 {
                        return Some(v.clone());
                    }
                    remaining -= 1;
                    env = rest;
                }
            }
        }
    }
}

/// A CEK machine value: the result of reducing a term to weak head
/// normal form. Distinct from `Constant` because closures and partially
/// applied builtins are runtime-only and have no flat/literal form.
#[derive(Debug, Clone)]
pub enum Value {
    Con(Rc<Constant>),
    Delay(Rc<Term<DeBruijn>>, Rc<Env>),
    Lambda(Rc<Term<DeBruijn>>, Rc<Env>),
    Builtin(BuiltinApp),
    Constr(u64, Vec<Value>),
    Bls12_381MlResult(Rc<MlResult>),
}

/// A builtin applied to zero or more forces and zero or more arguments,
/// not yet saturated.
#[derive(Debug, Clone)]
pub struct BuiltinApp {
    pub fun: DefaultFunction,
    pub forces: usize,
    pub args: Vec<Value>,
}

impl BuiltinApp {
    pub fn new(fun: DefaultFunction) -> Self {
        BuiltinApp { fun, forces: 0, args: Vec::new() }
    }

    pub fn is_saturated(&self) -> bool {
        self.args.len() == self.fun.arity()
    }
}

pub(crate) fn g1(v: &Value) -> Option<Rc<G1Element>> {
    match v {
        Value::Con(c) => match c.as_ref() {
            Constant::Bls12_381G1(g) => Some(Rc::new((**g).clone())),
            _ => None,
        },
        _ => None,
    }
}

pub(crate) fn g2(v: &Value) -> Option<Rc<G2Element>> {
    match v {
        Value::Con(c) => match c.as_ref() {
            Constant::Bls12_381G2(g) => Some(Rc::new((**g).clone())),
            _ => None,
        },
        _ => None,
    }
}
