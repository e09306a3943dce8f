//! The CEK (Control/Environment/Kontinuation) machine (§4.1).
//!
//! A small-step abstract machine over [`crate::ast::Term`] with de Bruijn
//! variables. Evaluation alternates between `Computing` a term down to a
//! value in an environment and `Returning` a value up through a stack of
//! continuation frames; every transition charges the step's fixed cost
//! plus, for builtin applications, the argument-size-dependent cost from
//! [`cost_model::CostModel`]. Evaluation fails as soon as either budget
//! axis goes negative.

pub mod builtins;
pub mod cost_model;
pub mod value;

use crate::ast::{Constant, DeBruijn, DefaultFunction, Term};
use crate::error::{Error, Result};
use cost_model::{CostModel, ExBudget};
use num_traits::Zero;
use std::rc::Rc;
use value::{BuiltinApp, Env, Value};

#[derive(Debug)]
enum Frame {
    AwaitFunTerm(Rc<Env>, Rc<Term<DeBruijn>>),
    AwaitArg(Value),
    Force,
    Constr(Rc<Env>, u64, Vec<Rc<Term<DeBruijn>>>, Vec<Value>),
    Cases(Rc<Env>, Vec<Rc<Term<DeBruijn>>>),
    /// Applies each remaining constructor field, in order, to the value
    /// produced by computing the selected `case` branch to whnf.
    CaseApply(Vec<Value>),
}

enum State {
    Computing(Rc<Env>, Rc<Term<DeBruijn>>),
    Returning(Value),
    Done(Value),
}

/// Drives one program to completion, tracking the remaining budget and a
/// trace log populated by the `trace` builtin.
pub struct Machine {
    cost_model: CostModel,
    budget: ExBudget,
    pub logs: Vec<String>,
}

impl Machine {
    pub fn new(cost_model: CostModel, initial_budget: ExBudget) -> Self {
        Machine { cost_model, budget: initial_budget, logs: Vec::new() }
    }

    pub fn remaining_budget(&self) -> ExBudget {
        self.budget
    }

    fn spend(&mut self, cost: ExBudget) -> Result<()> {
        self.budget = self.budget - cost;
        if self.budget.is_negative() {
            return Err(Error::OutOfBudget);
        }
        Ok(())
    }

    /// Runs the program to a final value, returning the value and the
    /// budget actually spent.
    pub fn evaluate(&mut self, term: Term<DeBruijn>) -> Result<(Value, ExBudget)> {
        let start = self.budget;
        self.spend(self.cost_model.machine_costs.startup)?;
        let mut stack: Vec<Frame> = Vec::new();
        let mut state = State::Computing(Rc::new(Env::Empty), Rc::new(term));

        loop {
            state = match state {
                State::Computing(env, term) => self.step_compute(env, term, &mut stack)?,
                State::Returning(value) => self.step_return(value, &mut stack)?,
                State::Done(value) => return Ok((value, start - self.budget)),
            };
        }
    }

    fn step_compute(&mut self, env: Rc<Env>, term: Rc<Term<DeBruijn>>, stack: &mut Vec<Frame>) -> Result<State> {
        match term.as_ref() {
            Term::Var(index) => {
                self.spend(self.cost_model.machine_costs.var)?;
                let value = env.lookup(index.0).ok_or(Error::OpenTermEvaluated(index.0))?;
                Ok(State::Returning((*value).clone()))
            }
            Term::Constant(c) => {
                self.spend(self.cost_model.machine_costs.constant)?;
                Ok(State::Returning(Value::Con(c.clone())))
            }
            Term::Lambda(body) => {
                self.spend(self.cost_model.machine_costs.lambda)?;
                Ok(State::Returning(Value::Lambda(body.clone(), env)))
            }
            Term::Delay(body) => {
                self.spend(self.cost_model.machine_costs.delay)?;
                Ok(State::Returning(Value::Delay(body.clone(), env)))
            }
            Term::Apply(f, a) => {
                self.spend(self.cost_model.machine_costs.apply)?;
                stack.push(Frame::AwaitFunTerm(env.clone(), a.clone()));
                Ok(State::Computing(env, f.clone()))
            }
            Term::Force(body) => {
                self.spend(self.cost_model.machine_costs.force)?;
                stack.push(Frame::Force);
                Ok(State::Computing(env, body.clone()))
            }
            Term::Error => Err(Error::ExplicitErrorTerm),
            Term::Builtin(fun) => {
                self.spend(self.cost_model.machine_costs.builtin)?;
                Ok(State::Returning(Value::Builtin(BuiltinApp::new(*fun))))
            }
            Term::Constr(tag, fields) => {
                self.spend(self.cost_model.machine_costs.constr)?;
                self.compute_constr_fields(env, *tag, fields.clone(), Vec::new(), stack)
            }
            Term::Case(scrutinee, branches) => {
                self.spend(self.cost_model.machine_costs.case)?;
                stack.push(Frame::Cases(env.clone(), branches.clone()));
                Ok(State::Computing(env, scrutinee.clone()))
            }
        }
    }

    fn compute_constr_fields(
        &mut self,
        env: Rc<Env>,
        tag: u64,
        mut remaining: Vec<Rc<Term<DeBruijn>>>,
        done: Vec<Value>,
        stack: &mut Vec<Frame>,
    ) -> Result<State> {
        if remaining.is_empty() {
            return Ok(State::Returning(Value::Constr(tag, done)));
        }
        let next = remaining.remove(0);
        stack.push(Frame::Constr(env.clone(), tag, remaining, done));
        Ok(State::Computing(env, next))
    }

    fn step_return(&mut self, value: Value, stack: &mut Vec<Frame>) -> Result<State> {
        let Some(frame) = stack.pop() else {
            return Ok(State::Done(value));
        };
        match frame {
            Frame::AwaitFunTerm(env, arg_term) => {
                stack.push(Frame::AwaitArg(value));
                Ok(State::Computing(env, arg_term))
            }
            Frame::AwaitArg(fun_value) => self.apply(fun_value, value),
            Frame::Force => match value {
                Value::Delay(body, env) => Ok(State::Computing(env, body)),
                Value::Builtin(app) if app.forces < app.fun.num_type_forces() => {
                    let mut app = app;
                    app.forces += 1;
                    self.dispatch_if_saturated(app)
                }
                _ => Err(Error::NonPolymorphicInstantiation),
            },
            Frame::Constr(env, tag, remaining, mut done) => {
                done.push(value);
                self.compute_constr_fields(env, tag, remaining, done, stack)
            }
            Frame::Cases(env, branches) => {
                let Value::Constr(tag, fields) = value else {
                    return Err(Error::NonFunctionApplication);
                };
                let branch = branches
                    .get(tag as usize)
                    .ok_or(Error::NonFunctionApplication)?
                    .clone();
                if fields.is_empty() {
                    Ok(State::Computing(env, branch))
                } else {
                    stack.push(Frame::CaseApply(fields));
                    Ok(State::Computing(env, branch))
                }
            }
            Frame::CaseApply(mut remaining) => {
                let next = remaining.remove(0);
                if !remaining.is_empty() {
                    stack.push(Frame::CaseApply(remaining));
                }
                self.apply(value, next)
            }
        }
    }

    fn apply(&mut self, fun: Value, arg: Value) -> Result<State> {
        match fun {
            Value::Lambda(body, env) => {
                let new_env = env.extend(arg);
                Ok(State::Computing(new_env, body))
            }
            Value::Builtin(mut app) => {
                app.args.push(arg);
                self.dispatch_if_saturated(app)
            }
            _ => Err(Error::NonFunctionApplication),
        }
    }

    fn dispatch_if_saturated(&mut self, app: BuiltinApp) -> Result<State> {
        if !app.is_saturated() {
            return Ok(State::Returning(Value::Builtin(app)));
        }
        let sizes: Vec<i64> = app.args.iter().map(ex_mem).collect();
        let cost = self.cost_model.builtin_cost(app.fun, &sizes);
        self.spend(cost)?;
        let result = builtins::apply_builtin(app.fun, &app.args)?;
        Ok(State::Returning(result))
    }
}

impl DefaultFunction {
    /// How many `force`s a builtin's polymorphic type signature requires
    /// before its term arguments can be supplied — one per `forall` in
    /// its Plutus Core type, e.g. `fstPair : forall a b. pair a b -> a`
    /// needs two.
    fn num_type_forces(self) -> usize {
        use DefaultFunction::*;
        match self {
            FstPair | SndPair | ChooseList => 2,
            IfThenElse | ChooseUnit | Trace | HeadList | TailList | NullList | MkCons
            | ChooseData => 1,
            _ => 0,
        }
    }
}

/// Rough memory size of a value, in 8-byte words, used to size builtin
/// costs. Mirrors the reference cost model's `ExMemoryUsage`: integers
/// are sized by their magnitude, bytestrings/strings by their byte
/// length, containers by the sum of their elements.
pub fn ex_mem(value: &Value) -> i64 {
    match value {
        Value::Con(c) => constant_mem(c),
        Value::Delay(_, _) | Value::Lambda(_, _) => 1,
        Value::Builtin(_) => 1,
        Value::Constr(_, fields) => 1 + fields.iter().map(ex_mem).sum::<i64>(),
        Value::Bls12_381MlResult(_) => 72,
    }
}

fn constant_mem(c: &Constant) -> i64 {
    match c {
        Constant::Integer(i) => {
            if i.magnitude().is_zero() {
                1
            } else {
                ((i.bits() + 63) / 64).max(1) as i64
            }
        }
        Constant::ByteString(b) => ((b.len() + 7) / 8).max(1) as i64,
        Constant::String(s) => s.chars().count() as i64,
        Constant::Unit => 1,
        Constant::Bool(_) => 1,
        Constant::ProtoList(_, xs) => xs.iter().map(constant_mem).sum(),
        Constant::ProtoPair(_, _, a, b) => constant_mem(a) + constant_mem(b),
        Constant::Data(_) => 4,
        Constant::Bls12_381G1(_) => 18,
        Constant::Bls12_381G2(_) => 36,
    }
}
