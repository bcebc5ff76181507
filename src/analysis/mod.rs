pub mod normalmodes;
